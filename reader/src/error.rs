//! Error types for CSDL XML translation.
//!
//! Every variant aborts the whole read; there is no partial document.

use thiserror::Error;

/// Errors that can occur while translating a CSDL XML tree.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The root element has no `Version` attribute.
    #[error("Version attribute not found")]
    MissingVersionAttribute,

    /// The root `Version` attribute is neither `4.0` nor `4.01`.
    #[error("unsupported CSDL version: {0}")]
    UnsupportedCsdlVersion(String),

    /// An element (or literal attribute) outside the closed CSDL grammar.
    #[error("unknown element: {0}")]
    UnknownElement(String),

    /// A construct lacks an attribute it cannot be translated without.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingRequiredAttribute {
        element: String,
        attribute: &'static str,
    },

    /// A scalar value that cannot be converted to its CSDL-JSON form.
    #[error("invalid {tag} value: '{value}'")]
    InvalidLiteral { tag: String, value: String },

    /// The input text is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl ReadError {
    pub(crate) fn invalid_literal(tag: &str, value: &str) -> Self {
        Self::InvalidLiteral {
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }
}

/// Convenience alias for results with [`ReadError`].
pub type Result<T> = std::result::Result<T, ReadError>;
