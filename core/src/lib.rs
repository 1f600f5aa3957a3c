//! Core vocabulary for OData CSDL-JSON metadata documents.
//!
//! This crate defines the small set of types shared between the XML reader
//! and anything that consumes its output:
//!
//! - [`CsdlKind`]: the `$Kind` discriminator of structural declarations.
//! - [`CsdlVersion`]: the supported CSDL versions (`4.0`, `4.01`).
//! - [`AnnotationName`]: term/qualifier pairs and their `@Term#Qualifier`
//!   member keys.
//! - [`MetadataDocument`]: the root document, serializable to CSDL-JSON.
//!
//! Declarations and annotation values are kept as [`serde_json::Value`]s;
//! their shapes are fixed by the OData CSDL-JSON format, not by Rust types.
//!
//! # Example
//!
//! ```
//! use csdl_core::*;
//! use serde_json::{Map, Value, json};
//!
//! let mut doc = MetadataDocument::new(CsdlVersion::V4_0);
//! let mut ns = Map::new();
//! ns.insert("Product".into(), json!({ "$Kind": CsdlKind::EntityType.as_str() }));
//! ns.insert(AnnotationName::new("Core.Description").key(), json!("demo"));
//! doc.namespaces.insert("ODataDemo".into(), Value::Object(ns));
//!
//! assert_eq!(
//!     doc.declaration("ODataDemo", "Product"),
//!     Some(&json!({ "$Kind": "EntityType" }))
//! );
//! ```

mod annotation;
mod document;
mod types;

pub use annotation::{AnnotationName, qualify_key};
pub use document::MetadataDocument;
pub use types::*;
