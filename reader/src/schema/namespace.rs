//! `Schema` elements.

use csdl_core::{CsdlKind, qualify_key};
use roxmltree::Node;
use serde_json::{Map, Value};
use tracing::debug;

use crate::attribute::{element_children, local_name, project, required, text};
use crate::error::{ReadError, Result};
use crate::expression;
use crate::merge::merge_child;
use crate::result::NamedResult;

/// A schema becomes a namespace object keyed by its `Namespace`.
///
/// Actions and functions are collected into overload arrays. External
/// `Annotations` blocks are gathered under `$Annotations`, keyed by target.
pub(crate) fn read_schema(elem: Node<'_, '_>) -> Result<NamedResult> {
    let namespace = required(elem, "Namespace")?;
    let mut result = Map::new();
    project(elem, &mut result, "Alias", text)?;

    let mut items = Vec::new();
    let mut targets = Map::new();
    for child in element_children(elem) {
        if local_name(child) == "Annotations" {
            read_annotations(child, &mut targets)?;
        } else {
            merge_child(child, &mut items)?;
        }
    }

    for item in items {
        let overload = item.kind.is_some_and(CsdlKind::is_operation);
        let (name, value) = item.into_entry();
        if overload {
            match result.get_mut(&name) {
                Some(Value::Array(overloads)) => overloads.push(value),
                _ => {
                    result.insert(name, Value::Array(vec![value]));
                }
            }
        } else {
            result.insert(name, value);
        }
    }
    if !targets.is_empty() {
        result.insert("$Annotations".into(), Value::Object(targets));
    }

    debug!(namespace, members = result.len(), "Read schema");
    Ok(NamedResult::aggregate(namespace, Some(CsdlKind::Namespace), result).consumed())
}

/// Reads `<Annotations Target=".." [Qualifier=".."]>` into `targets`.
///
/// The block qualifier applies to annotations that carry none. Blocks
/// sharing a target merge into one object.
fn read_annotations(elem: Node<'_, '_>, targets: &mut Map<String, Value>) -> Result<()> {
    let target = required(elem, "Target")?;
    let qualifier = elem.attribute("Qualifier");

    let entry = targets
        .entry(target)
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(annotations) = entry else {
        return Ok(());
    };

    for child in element_children(elem) {
        let tag = local_name(child);
        if tag != "Annotation" {
            return Err(ReadError::UnknownElement(tag.to_string()));
        }
        let block_qualifier = qualifier.filter(|_| child.attribute("Qualifier").is_none());
        for item in expression::evaluate(child)? {
            let (mut name, value) = item.into_entry();
            if let Some(q) = block_qualifier {
                name = qualify_term(&name, q);
            }
            annotations.insert(name, value);
        }
    }
    Ok(())
}

/// Qualifies the leading `@Term` of an annotation key, leaving any nested
/// annotation suffix (`@Term@Nested`) in place.
fn qualify_term(name: &str, qualifier: &str) -> String {
    match name.char_indices().skip(1).find(|&(_, c)| c == '@') {
        Some((split, _)) => {
            let (head, tail) = name.split_at(split);
            format!("{}{tail}", qualify_key(head, qualifier))
        }
        None => qualify_key(name, qualifier),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use roxmltree::Document;
    use serde_json::json;

    use super::*;

    fn read(xml: &str) -> Result<(String, Value)> {
        let doc = Document::parse(xml).unwrap();
        read_schema(doc.root_element()).map(NamedResult::into_entry)
    }

    #[test]
    fn test_operations_form_overload_arrays() {
        let (name, value) = read(
            r#"<Schema Namespace="ODataDemo" Alias="Demo">
                 <Function Name="Rated"><ReturnType Type="Edm.Int32"/></Function>
                 <Function Name="Rated">
                   <Parameter Name="Min" Type="Edm.Int32"/>
                   <ReturnType Type="Edm.Int32"/>
                 </Function>
                 <Action Name="Reset"/>
                 <Annotation Term="Core.Description" String="demo"/>
               </Schema>"#,
        )
        .unwrap();
        assert_eq!(name, "ODataDemo");
        assert_eq!(
            value,
            json!({
                "$Alias": "Demo",
                "Rated": [
                    { "$Kind": "Function", "$ReturnType": { "$Type": "Edm.Int32", "$Nullable": true } },
                    {
                        "$Kind": "Function",
                        "$ReturnType": { "$Type": "Edm.Int32", "$Nullable": true },
                        "$Parameter": [{ "$Name": "Min", "$Type": "Edm.Int32", "$Nullable": true }]
                    }
                ],
                "Reset": [{ "$Kind": "Action" }],
                "@Core.Description": "demo"
            })
        );
    }

    #[test]
    fn test_external_annotations_merge_by_target() {
        let (_, value) = read(
            r#"<Schema Namespace="ODataDemo">
                 <Annotations Target="ODataDemo.Product/Name">
                   <Annotation Term="Core.Description" String="name"/>
                 </Annotations>
                 <Annotations Target="ODataDemo.Product/Name" Qualifier="Phone">
                   <Annotation Term="UI.Hidden"/>
                   <Annotation Term="UI.Label" Qualifier="Short" String="N"/>
                   <Annotation Term="Core.Description">
                     <String>Name</String>
                     <Annotation Term="Core.IsLanguageDependent"/>
                   </Annotation>
                 </Annotations>
               </Schema>"#,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "$Annotations": {
                    "ODataDemo.Product/Name": {
                        "@Core.Description": "name",
                        "@UI.Hidden#Phone": true,
                        "@UI.Label#Short": "N",
                        "@Core.Description#Phone": "Name",
                        "@Core.Description#Phone@Core.IsLanguageDependent": true
                    }
                }
            })
        );
    }

    #[test]
    fn test_annotations_block_accepts_only_annotations() {
        let err = read(
            r#"<Schema Namespace="A"><Annotations Target="A.T"><Record/></Annotations></Schema>"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::UnknownElement(ref tag) if tag == "Record"));
    }

    #[test]
    fn test_schema_requires_namespace() {
        let err = read(r#"<Schema Alias="A"/>"#).unwrap_err();
        assert_eq!(err.to_string(), "<Schema> is missing required attribute 'Namespace'");
    }

    #[test]
    fn test_qualify_term() {
        assert_eq!(qualify_term("@UI.Hidden", "Phone"), "@UI.Hidden#Phone");
        assert_eq!(qualify_term("@A.B@C.D", "Q"), "@A.B#Q@C.D");
    }
}
