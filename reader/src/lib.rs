//! OData CSDL XML to CSDL-JSON translation.
//!
//! The reader walks an already-parsed [`roxmltree`] element tree and
//! produces a [`MetadataDocument`] whose members follow the CSDL-JSON
//! format: `$Kind`-tagged declarations, `@Term#Qualifier` annotation keys
//! and `$`-prefixed expression objects.
//!
//! Translation is a single synchronous pass with no shared state, so
//! independent documents can be read from several threads at once. The
//! first element that cannot be translated aborts the whole read.
//!
//! # Example
//!
//! ```
//! use csdl_reader::load_from_xml;
//! use serde_json::json;
//!
//! let xml = r#"
//! <edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
//!   <edmx:DataServices>
//!     <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="ODataDemo">
//!       <EnumType Name="ShippingMethod">
//!         <Member Name="FirstClass"/>
//!         <Member Name="TwoDay"/>
//!       </EnumType>
//!     </Schema>
//!   </edmx:DataServices>
//! </edmx:Edmx>"#;
//!
//! let doc = load_from_xml(xml)?;
//! assert_eq!(
//!     doc.declaration("ODataDemo", "ShippingMethod"),
//!     Some(&json!({ "$Kind": "EnumType", "FirstClass": 0, "TwoDay": 1 }))
//! );
//! # Ok::<(), csdl_reader::ReadError>(())
//! ```

mod attribute;
mod document;
mod error;
pub mod expression;
pub mod literal;
mod merge;
mod result;
mod schema;

pub use csdl_core::{CsdlKind, CsdlVersion, MetadataDocument};
pub use document::{ReaderOptions, load_from_xml, load_from_xml_with, read_document, read_document_with};
pub use error::{ReadError, Result};
pub use result::{NamedResult, ReadValue};
