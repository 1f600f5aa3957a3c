//! The root CSDL-JSON metadata document.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::{API_ROOT_KEY, CsdlVersion, REFERENCE_KEY, VERSION_KEY};

/// A fully translated metadata document.
///
/// Serializes to the CSDL-JSON root object: `$Version`, `$ApiRoot`,
/// `$Reference` (only when references exist), then one member per schema
/// namespace in document order.
///
/// # Examples
///
/// ```
/// use csdl_core::{CsdlVersion, MetadataDocument};
/// use serde_json::{Map, Value, json};
///
/// let mut doc = MetadataDocument::new(CsdlVersion::V4_0);
/// doc.namespaces.insert("ODataDemo".into(), Value::Object(Map::new()));
///
/// assert_eq!(
///     doc.to_value(),
///     json!({ "$Version": "4.0", "$ApiRoot": "", "ODataDemo": {} })
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    pub version: CsdlVersion,
    pub api_root: String,
    /// Referenced documents keyed by URI.
    pub references: Map<String, Value>,
    /// Schema contents keyed by namespace, each a JSON object.
    pub namespaces: Map<String, Value>,
}

impl MetadataDocument {
    pub fn new(version: CsdlVersion) -> Self {
        Self {
            version,
            api_root: String::new(),
            references: Map::new(),
            namespaces: Map::new(),
        }
    }

    /// Returns the contents of a schema namespace.
    pub fn namespace(&self, name: &str) -> Option<&Map<String, Value>> {
        self.namespaces.get(name).and_then(Value::as_object)
    }

    /// Returns a declaration by namespace and name.
    ///
    /// Operation overload sets are returned as the whole array.
    pub fn declaration(&self, namespace: &str, name: &str) -> Option<&Value> {
        self.namespace(namespace).and_then(|ns| ns.get(name))
    }

    /// Projects the document into its CSDL-JSON object form.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(VERSION_KEY.into(), Value::from(self.version.as_str()));
        root.insert(API_ROOT_KEY.into(), Value::from(self.api_root.clone()));
        if !self.references.is_empty() {
            root.insert(REFERENCE_KEY.into(), Value::Object(self.references.clone()));
        }
        for (name, ns) in &self.namespaces {
            root.insert(name.clone(), ns.clone());
        }
        Value::Object(root)
    }
}

impl Serialize for MetadataDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_references = !self.references.is_empty();
        let len = 2 + usize::from(has_references) + self.namespaces.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(VERSION_KEY, &self.version)?;
        map.serialize_entry(API_ROOT_KEY, &self.api_root)?;
        if has_references {
            map.serialize_entry(REFERENCE_KEY, &self.references)?;
        }
        for (name, ns) in &self.namespaces {
            map.serialize_entry(name, ns)?;
        }
        map.end()
    }
}
