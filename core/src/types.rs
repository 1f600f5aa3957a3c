//! CSDL vocabulary shared by the reader and its consumers.
//!
//! The target CSDL-JSON shapes themselves are plain [`serde_json`] values;
//! this module only names the discriminators and versions that the reader
//! has to reason about while building them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key of the kind discriminator carried by structural declarations.
pub const KIND_KEY: &str = "$Kind";

/// Key of the document version member.
pub const VERSION_KEY: &str = "$Version";

/// Key of the service root member.
pub const API_ROOT_KEY: &str = "$ApiRoot";

/// Key of the document reference map.
pub const REFERENCE_KEY: &str = "$Reference";

/// Discriminator tag for CSDL model elements.
///
/// Structural declarations carry exactly one of these under [`KIND_KEY`].
/// [`Namespace`](CsdlKind::Namespace), [`Reference`](CsdlKind::Reference)
/// and [`Annotation`](CsdlKind::Annotation) are only used for grouping and
/// never appear as a `$Kind` value in output.
///
/// # Examples
///
/// ```
/// use csdl_core::CsdlKind;
///
/// assert_eq!(CsdlKind::EntityType.as_str(), "EntityType");
/// assert!(CsdlKind::Function.is_operation());
/// assert!(!CsdlKind::FunctionImport.is_operation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CsdlKind {
    Namespace,
    Reference,
    EntityType,
    ComplexType,
    EnumType,
    TypeDefinition,
    Property,
    NavigationProperty,
    EntityContainer,
    EntitySet,
    Singleton,
    Action,
    Function,
    ActionImport,
    FunctionImport,
    Annotation,
}

impl CsdlKind {
    /// Returns the CSDL-JSON spelling of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "Namespace",
            Self::Reference => "Reference",
            Self::EntityType => "EntityType",
            Self::ComplexType => "ComplexType",
            Self::EnumType => "EnumType",
            Self::TypeDefinition => "TypeDefinition",
            Self::Property => "Property",
            Self::NavigationProperty => "NavigationProperty",
            Self::EntityContainer => "EntityContainer",
            Self::EntitySet => "EntitySet",
            Self::Singleton => "Singleton",
            Self::Action => "Action",
            Self::Function => "Function",
            Self::ActionImport => "ActionImport",
            Self::FunctionImport => "FunctionImport",
            Self::Annotation => "Annotation",
        }
    }

    /// Returns `true` for kinds that form overload sets inside a namespace.
    pub const fn is_operation(self) -> bool {
        matches!(self, Self::Action | Self::Function)
    }
}

impl fmt::Display for CsdlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported CSDL versions.
///
/// # Examples
///
/// ```
/// use csdl_core::CsdlVersion;
///
/// let version: CsdlVersion = "4.01".parse().unwrap();
/// assert_eq!(version, CsdlVersion::V4_01);
/// assert!("3.0".parse::<CsdlVersion>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CsdlVersion {
    #[serde(rename = "4.0")]
    V4_0,
    #[serde(rename = "4.01")]
    V4_01,
}

impl CsdlVersion {
    /// Returns the version string as written in `$Version`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V4_0 => "4.0",
            Self::V4_01 => "4.01",
        }
    }
}

impl fmt::Display for CsdlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `Version` attribute outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported CSDL version: {0}")]
pub struct UnsupportedVersion(pub String);

impl FromStr for CsdlVersion {
    type Err = UnsupportedVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4.0" => Ok(Self::V4_0),
            "4.01" => Ok(Self::V4_01),
            other => Err(UnsupportedVersion(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_bare_name() {
        let json = serde_json::to_value(CsdlKind::NavigationProperty).unwrap();
        assert_eq!(json, serde_json::json!("NavigationProperty"));
    }

    #[test]
    fn test_version_round_trips_through_serde_spelling() {
        let json = serde_json::to_value(CsdlVersion::V4_01).unwrap();
        assert_eq!(json, serde_json::json!("4.01"));
        let back: CsdlVersion = serde_json::from_value(json).unwrap();
        assert_eq!(back, CsdlVersion::V4_01);
    }

    #[test]
    fn test_version_rejects_unknown_strings() {
        let err = "4.1".parse::<CsdlVersion>().unwrap_err();
        assert_eq!(err, UnsupportedVersion("4.1".to_string()));
        assert_eq!(err.to_string(), "unsupported CSDL version: 4.1");
    }

    #[test]
    fn test_only_actions_and_functions_are_operations() {
        assert!(CsdlKind::Action.is_operation());
        assert!(CsdlKind::Function.is_operation());
        assert!(!CsdlKind::ActionImport.is_operation());
        assert!(!CsdlKind::EntityType.is_operation());
    }
}
