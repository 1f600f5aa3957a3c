//! The intermediate value every reader produces.

use csdl_core::CsdlKind;
use serde_json::{Map, Value};

/// What a reader produced, and how children may be attached to it.
///
/// An aggregate accepts grandchild results as members. A scalar cannot,
/// so grandchild results become flattened siblings named
/// `<parent name><child name>` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadValue {
    Aggregate(Map<String, Value>),
    Scalar(Value),
}

impl ReadValue {
    /// Classifies a computed JSON value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Aggregate(map),
            other => Self::Scalar(other),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Aggregate(map) => Value::Object(map),
            Self::Scalar(value) => value,
        }
    }
}

/// A translated element ready to be merged into its parent.
///
/// `name` is the member key in the parent; an empty name means the value
/// stands for the parent itself (expression operands, annotation bodies).
/// `children_consumed` tells the merge engine whether the reader already
/// handled the element's own children.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedResult {
    pub name: String,
    pub kind: Option<CsdlKind>,
    pub value: ReadValue,
    pub children_consumed: bool,
}

impl NamedResult {
    /// An unnamed expression value.
    pub fn anonymous(value: Value) -> Self {
        Self {
            name: String::new(),
            kind: None,
            value: ReadValue::from_value(value),
            children_consumed: true,
        }
    }

    /// A declaration object whose children are still to be merged.
    pub fn aggregate(name: impl Into<String>, kind: Option<CsdlKind>, map: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: ReadValue::Aggregate(map),
            children_consumed: false,
        }
    }

    /// A simple value whose children are still to be merged.
    pub fn scalar(name: impl Into<String>, kind: Option<CsdlKind>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind,
            value: ReadValue::Scalar(value),
            children_consumed: false,
        }
    }

    /// Marks the element's children as already incorporated.
    pub fn consumed(mut self) -> Self {
        self.children_consumed = true;
        self
    }

    pub fn is_annotation(&self) -> bool {
        self.kind == Some(CsdlKind::Annotation)
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn into_value(self) -> Value {
        self.value.into_value()
    }

    /// Splits into the member key and value.
    pub fn into_entry(self) -> (String, Value) {
        (self.name, self.value.into_value())
    }

    /// Renames to `<prefix><name>`, the form used for flattened siblings.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.name.insert_str(0, prefix);
        self
    }

    /// Returns the value wrapped as `{ name: value }` when named.
    ///
    /// Operand lists use this so a named operand keeps its label.
    pub fn into_operand(self) -> Value {
        if self.is_named() {
            let mut map = Map::new();
            map.insert(self.name, self.value.into_value());
            Value::Object(map)
        } else {
            self.value.into_value()
        }
    }
}
