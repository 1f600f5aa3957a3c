//! Document assembly: version validation and top-level partitioning.

use csdl_core::{CsdlKind, CsdlVersion, MetadataDocument};
use roxmltree::{Document, Node};
use serde_json::Value;
use tracing::debug;

use crate::error::{ReadError, Result};
use crate::merge::merge_children;
use crate::result::ReadValue;

/// Settings applied while assembling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Value written to `$ApiRoot`.
    pub api_root: String,
}

impl ReaderOptions {
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }
}

/// Translates the root element of a CSDL XML document with default options.
pub fn read_document(root: Node<'_, '_>) -> Result<MetadataDocument> {
    read_document_with(root, &ReaderOptions::default())
}

/// Translates the root element of a CSDL XML document.
///
/// `Schema` children (also inside `DataServices`) become namespaces and
/// `Reference` children populate `$Reference`. Other top-level results are
/// not part of the document model and are dropped.
///
/// # Errors
///
/// Fails on a missing or unsupported `Version`, and on the first element
/// that cannot be translated.
pub fn read_document_with(root: Node<'_, '_>, options: &ReaderOptions) -> Result<MetadataDocument> {
    let raw = root
        .attribute("Version")
        .ok_or(ReadError::MissingVersionAttribute)?;
    let version: CsdlVersion = raw
        .parse()
        .map_err(|_| ReadError::UnsupportedCsdlVersion(raw.to_string()))?;
    debug!(version = %version, root = root.tag_name().name(), "Reading CSDL document");

    let mut document = MetadataDocument::new(version);
    document.api_root.clone_from(&options.api_root);

    for item in merge_children(root)? {
        match (item.kind, item.value) {
            (Some(CsdlKind::Namespace), ReadValue::Aggregate(members)) => {
                document.namespaces.insert(item.name, Value::Object(members));
            }
            (Some(CsdlKind::Reference), value) => {
                document.references.insert(item.name, value.into_value());
            }
            (kind, _) => debug!(name = %item.name, kind = ?kind, "Skipping top-level item"),
        }
    }

    debug!(
        namespaces = document.namespaces.len(),
        references = document.references.len(),
        "Read CSDL document"
    );
    Ok(document)
}

/// Parses XML text and translates it with default options.
///
/// # Examples
///
/// ```
/// let doc = csdl_reader::load_from_xml(
///     r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.01">
///          <edmx:DataServices>
///            <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Demo"/>
///          </edmx:DataServices>
///        </edmx:Edmx>"#,
/// )?;
/// assert_eq!(doc.version.as_str(), "4.01");
/// assert!(doc.namespace("Demo").is_some());
/// # Ok::<(), csdl_reader::ReadError>(())
/// ```
pub fn load_from_xml(xml: &str) -> Result<MetadataDocument> {
    load_from_xml_with(xml, &ReaderOptions::default())
}

/// Parses XML text and translates it.
pub fn load_from_xml_with(xml: &str, options: &ReaderOptions) -> Result<MetadataDocument> {
    let parsed = Document::parse(xml)?;
    read_document_with(parsed.root_element(), options)
}
