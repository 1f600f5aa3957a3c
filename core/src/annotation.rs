//! Annotation key synthesis.
//!
//! CSDL-JSON stores annotations as object members whose key is built from
//! the term and optional qualifier (`@Term#Qualifier`).

use std::fmt;

/// Term plus optional qualifier identifying one annotation.
///
/// # Examples
///
/// ```
/// use csdl_core::AnnotationName;
///
/// let name = AnnotationName::new("Core.Description");
/// assert_eq!(name.key(), "@Core.Description");
///
/// let qualified = AnnotationName::new("UI.LineItem").with_qualifier("Tablet");
/// assert_eq!(qualified.key(), "@UI.LineItem#Tablet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationName {
    pub term: String,
    pub qualifier: Option<String>,
}

impl AnnotationName {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            qualifier: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Returns the member key, `@Term` or `@Term#Qualifier`.
    pub fn key(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("@{}#{}", self.term, q),
            None => format!("@{}", self.term),
        }
    }
}

impl fmt::Display for AnnotationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Appends `qualifier` to an annotation key that has none.
///
/// Keys that already carry a `#` qualifier are returned unchanged.
pub fn qualify_key(key: &str, qualifier: &str) -> String {
    if key.contains('#') {
        key.to_string()
    } else {
        format!("{key}#{qualifier}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unqualified_key() {
        assert_eq!(AnnotationName::new("Core.Computed").key(), "@Core.Computed");
    }

    #[test]
    fn test_qualified_key_displays_as_member_key() {
        let name = AnnotationName::new("UI.LineItem").with_qualifier("Tablet");
        assert_eq!(name.to_string(), "@UI.LineItem#Tablet");
    }

    #[test]
    fn test_qualify_key_keeps_existing_qualifier() {
        assert_eq!(qualify_key("@UI.LineItem", "Phone"), "@UI.LineItem#Phone");
        assert_eq!(
            qualify_key("@UI.LineItem#Tablet", "Phone"),
            "@UI.LineItem#Tablet"
        );
    }
}
