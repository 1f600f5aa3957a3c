//! `Reference`, `Include` and `IncludeAnnotations`.

use csdl_core::CsdlKind;
use roxmltree::Node;
use serde_json::{Map, Value};

use crate::attribute::{element_children, local_name, project, required, text};
use crate::error::{ReadError, Result};
use crate::merge::merge_child;
use crate::result::NamedResult;

const INCLUDE_KEY: &str = "$Include";
const INCLUDE_ANNOTATIONS_KEY: &str = "$IncludeAnnotations";

/// A referenced document, keyed by its `Uri`.
pub(crate) fn read_reference(elem: Node<'_, '_>) -> Result<NamedResult> {
    let uri = required(elem, "Uri")?;

    let mut items = Vec::new();
    for child in element_children(elem) {
        match local_name(child) {
            "Include" | "IncludeAnnotations" | "Annotation" => merge_child(child, &mut items)?,
            other => return Err(ReadError::UnknownElement(other.to_string())),
        }
    }

    let mut result = Map::new();
    for item in items {
        let (name, value) = item.into_entry();
        if name == INCLUDE_KEY || name == INCLUDE_ANNOTATIONS_KEY {
            if let Value::Array(list) = result
                .entry(name)
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                list.push(value);
            }
        } else {
            result.insert(name, value);
        }
    }

    Ok(NamedResult::aggregate(uri, Some(CsdlKind::Reference), result).consumed())
}

pub(crate) fn read_include(elem: Node<'_, '_>) -> Result<NamedResult> {
    let mut result = Map::new();
    result.insert("$Namespace".into(), Value::from(required(elem, "Namespace")?));
    project(elem, &mut result, "Alias", text)?;
    Ok(NamedResult::aggregate(INCLUDE_KEY, None, result))
}

pub(crate) fn read_include_annotations(elem: Node<'_, '_>) -> Result<NamedResult> {
    let mut result = Map::new();
    result.insert(
        "$TermNamespace".into(),
        Value::from(required(elem, "TermNamespace")?),
    );
    project(elem, &mut result, "Qualifier", text)?;
    project(elem, &mut result, "TargetNamespace", text)?;
    Ok(NamedResult::aggregate(INCLUDE_ANNOTATIONS_KEY, None, result))
}
