//! Structural and navigation properties, and the shared type-reference
//! projection used by parameters and return types.

use csdl_core::CsdlKind;
use roxmltree::Node;
use serde_json::{Map, Value};

use super::declaration;
use crate::attribute::{
    boolean, element_children, facet, integer, local_name, nullable, project, required, text,
};
use crate::error::{ReadError, Result};
use crate::expression;
use crate::merge::merge_children;
use crate::result::NamedResult;

pub(crate) fn read_property(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::Property);
    type_reference(elem, &mut result)?;
    project(elem, &mut result, "DefaultValue", text)?;

    Ok(NamedResult::aggregate(name, Some(CsdlKind::Property), result))
}

/// Projects `Type` and its facets.
///
/// `$Nullable` is always written. `Collection(T)` is unwrapped to `T` with
/// `$Collection: true`.
pub(crate) fn type_reference(elem: Node<'_, '_>, target: &mut Map<String, Value>) -> Result<()> {
    let (type_name, is_collection) = unwrap_type(required(elem, "Type")?);
    target.insert("$Type".into(), Value::from(type_name));
    if is_collection {
        target.insert("$Collection".into(), Value::Bool(true));
    }
    target.insert("$Nullable".into(), Value::Bool(nullable(elem)));
    project(elem, target, "MaxLength", facet)?;
    project(elem, target, "Precision", integer)?;
    project(elem, target, "Scale", facet)?;
    project(elem, target, "Unicode", boolean)?;
    project(elem, target, "SRID", facet)?;
    Ok(())
}

/// Splits `Collection(T)` into `(T, true)`; other names pass through.
pub(crate) fn unwrap_type(type_name: &str) -> (&str, bool) {
    match type_name
        .strip_prefix("Collection(")
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (type_name, false),
    }
}

pub(crate) fn read_navigation_property(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::NavigationProperty);

    let (type_name, is_collection) = unwrap_type(required(elem, "Type")?);
    result.insert("$Type".into(), Value::from(type_name));
    if is_collection {
        result.insert("$Collection".into(), Value::Bool(true));
    }
    result.insert("$Nullable".into(), Value::Bool(nullable(elem)));
    project(elem, &mut result, "Partner", text)?;
    project(elem, &mut result, "ContainsTarget", boolean)?;

    for child in element_children(elem) {
        match local_name(child) {
            "OnDelete" => {
                result.insert("$OnDelete".into(), Value::from(required(child, "Action")?));
                for item in merge_children(child)? {
                    let (key, value) = item.prefixed("$OnDelete").into_entry();
                    result.insert(key, value);
                }
            }
            "ReferentialConstraint" => {
                let property = required(child, "Property")?;
                let referenced = required(child, "ReferencedProperty")?;
                let constraints = result
                    .entry("$ReferentialConstraint")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(constraints) = constraints {
                    constraints.insert(property.to_string(), Value::from(referenced));
                    for item in merge_children(child)? {
                        let (key, value) = item.prefixed(property).into_entry();
                        constraints.insert(key, value);
                    }
                }
            }
            "Annotation" => {
                for item in expression::evaluate(child)? {
                    let (key, value) = item.into_entry();
                    result.insert(key, value);
                }
            }
            other => return Err(ReadError::UnknownElement(other.to_string())),
        }
    }

    Ok(NamedResult::aggregate(name, Some(CsdlKind::NavigationProperty), result).consumed())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use roxmltree::Document;
    use serde_json::json;

    use super::*;

    fn read(xml: &str, reader: fn(Node<'_, '_>) -> Result<NamedResult>) -> Result<Value> {
        let doc = Document::parse(xml).unwrap();
        reader(doc.root_element()).map(NamedResult::into_value)
    }

    #[test]
    fn test_unwrap_type() {
        assert_eq!(unwrap_type("Collection(ODataDemo.Product)"), ("ODataDemo.Product", true));
        assert_eq!(unwrap_type("Edm.String"), ("Edm.String", false));
        assert_eq!(unwrap_type("Collection(Edm.String"), ("Collection(Edm.String", false));
    }

    #[test]
    fn test_property_facets() {
        let value = read(
            r#"<Property Name="Price" Type="Edm.Decimal" Precision="10" Scale="variable" Nullable="false" DefaultValue="0"/>"#,
            read_property,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "$Kind": "Property",
                "$Type": "Edm.Decimal",
                "$Nullable": false,
                "$Precision": 10,
                "$Scale": "variable",
                "$DefaultValue": "0"
            })
        );
    }

    #[test]
    fn test_collection_property() {
        let value = read(
            r#"<Property Name="Tags" Type="Collection(Edm.String)" MaxLength="max" SRID="4326"/>"#,
            read_property,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "$Kind": "Property",
                "$Type": "Edm.String",
                "$Collection": true,
                "$Nullable": true,
                "$MaxLength": "max",
                "$SRID": 4326
            })
        );
    }

    #[test]
    fn test_property_requires_type() {
        let err = read(r#"<Property Name="ID"/>"#, read_property).unwrap_err();
        assert_eq!(err.to_string(), "<Property> is missing required attribute 'Type'");
    }

    #[test]
    fn test_navigation_property_on_delete_and_constraints() {
        let value = read(
            r#"<NavigationProperty Name="Category" Type="ODataDemo.Category" Partner="Products" ContainsTarget="false">
                 <ReferentialConstraint Property="CategoryID" ReferencedProperty="ID">
                   <Annotation Term="Core.Description" String="joins on ID"/>
                 </ReferentialConstraint>
                 <OnDelete Action="Cascade">
                   <Annotation Term="Core.Description" String="Delete all products"/>
                 </OnDelete>
                 <Annotation Term="Core.Immutable"/>
               </NavigationProperty>"#,
            read_navigation_property,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "$Kind": "NavigationProperty",
                "$Type": "ODataDemo.Category",
                "$Nullable": true,
                "$Partner": "Products",
                "$ContainsTarget": false,
                "$ReferentialConstraint": {
                    "CategoryID": "ID",
                    "CategoryID@Core.Description": "joins on ID"
                },
                "$OnDelete": "Cascade",
                "$OnDelete@Core.Description": "Delete all products",
                "@Core.Immutable": true
            })
        );
    }

    #[test]
    fn test_on_delete_requires_action() {
        let err = read(
            r#"<NavigationProperty Name="C" Type="X.C"><OnDelete/></NavigationProperty>"#,
            read_navigation_property,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "<OnDelete> is missing required attribute 'Action'");
    }

    #[test]
    fn test_navigation_property_rejects_unknown_children() {
        let err = read(
            r#"<NavigationProperty Name="C" Type="X.C"><Key/></NavigationProperty>"#,
            read_navigation_property,
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::UnknownElement(ref tag) if tag == "Key"));
    }
}
