//! Entity, complex, enum and type-definition declarations.

use csdl_core::CsdlKind;
use roxmltree::Node;
use serde_json::{Map, Value};
use tracing::trace;

use super::declaration;
use crate::attribute::{boolean, element_children, facet, integer, local_name, project, required, text};
use crate::error::{ReadError, Result};
use crate::merge::merge_children;
use crate::result::{NamedResult, ReadValue};

pub(crate) fn read_entity_type(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::EntityType);
    project(elem, &mut result, "BaseType", text)?;
    project(elem, &mut result, "Abstract", boolean)?;
    project(elem, &mut result, "OpenType", boolean)?;
    project(elem, &mut result, "HasStream", boolean)?;

    insert_all(&mut result, merge_children(elem)?);
    Ok(NamedResult::aggregate(name, Some(CsdlKind::EntityType), result).consumed())
}

pub(crate) fn read_complex_type(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::ComplexType);
    project(elem, &mut result, "BaseType", text)?;
    project(elem, &mut result, "Abstract", boolean)?;
    project(elem, &mut result, "OpenType", boolean)?;

    insert_all(&mut result, merge_children(elem)?);
    Ok(NamedResult::aggregate(name, Some(CsdlKind::ComplexType), result).consumed())
}

/// Members without a `Value` are numbered from 0 in document order.
///
/// Only members that receive a generated value advance the counter, so an
/// explicit `Value` neither bumps nor re-bases the numbering of the members
/// after it.
pub(crate) fn read_enum_type(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::EnumType);
    project(elem, &mut result, "UnderlyingType", text)?;
    project(elem, &mut result, "IsFlags", boolean)?;

    let mut next = 0_i64;
    for mut member in merge_children(elem)? {
        if !member.is_annotation() && member.value == ReadValue::Scalar(Value::Null) {
            trace!(member = %member.name, value = next, "Assigning enum member value");
            member.value = ReadValue::Scalar(Value::from(next));
            next += 1;
        }
        let (key, value) = member.into_entry();
        result.insert(key, value);
    }

    Ok(NamedResult::aggregate(name, Some(CsdlKind::EnumType), result).consumed())
}

/// An enum member is a bare number, or `null` until its enum numbers it.
pub(crate) fn read_member(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let value = match elem.attribute("Value") {
        Some(raw) => integer("Value", raw)?,
        None => Value::Null,
    };
    Ok(NamedResult::scalar(name, None, value))
}

pub(crate) fn read_type_definition(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::TypeDefinition);
    result.insert(
        "$UnderlyingType".into(),
        Value::from(required(elem, "UnderlyingType")?),
    );
    project(elem, &mut result, "MaxLength", facet)?;
    project(elem, &mut result, "Unicode", boolean)?;
    project(elem, &mut result, "Precision", integer)?;
    project(elem, &mut result, "Scale", facet)?;
    project(elem, &mut result, "SRID", facet)?;

    Ok(NamedResult::aggregate(name, Some(CsdlKind::TypeDefinition), result))
}

/// `$Key`: property names, or `{ alias: path }` for aliased key parts.
pub(crate) fn read_key(elem: Node<'_, '_>) -> Result<NamedResult> {
    let mut parts = Vec::new();
    for child in element_children(elem) {
        let tag = local_name(child);
        if tag != "PropertyRef" {
            return Err(ReadError::UnknownElement(tag.to_string()));
        }
        let path = required(child, "Name")?;
        let part = match child.attribute("Alias") {
            Some(alias) => {
                let mut aliased = Map::new();
                aliased.insert(alias.to_string(), Value::from(path));
                Value::Object(aliased)
            }
            None => Value::from(path),
        };
        parts.push(part);
    }
    Ok(NamedResult::scalar("$Key", None, Value::Array(parts)).consumed())
}

pub(crate) fn insert_all(target: &mut Map<String, Value>, results: Vec<NamedResult>) {
    for result in results {
        let (name, value) = result.into_entry();
        target.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use roxmltree::Document;
    use serde_json::json;

    use super::*;

    fn read(xml: &str, reader: fn(Node<'_, '_>) -> Result<NamedResult>) -> Result<(String, Value)> {
        let doc = Document::parse(xml).unwrap();
        reader(doc.root_element()).map(NamedResult::into_entry)
    }

    #[test]
    fn test_enum_members_are_numbered_in_document_order() {
        let (_, value) = read(
            r#"<EnumType Name="ShippingMethod">
                 <Member Name="FirstClass"/>
                 <Member Name="TwoDay"/>
                 <Member Name="Overnight"/>
               </EnumType>"#,
            read_enum_type,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({ "$Kind": "EnumType", "FirstClass": 0, "TwoDay": 1, "Overnight": 2 })
        );
    }

    #[test]
    fn test_explicit_enum_values_do_not_move_the_counter() {
        let (_, value) = read(
            r#"<EnumType Name="Pattern" UnderlyingType="Edm.Int32" IsFlags="true">
                 <Member Name="Plain"/>
                 <Member Name="Red" Value="8"/>
                 <Member Name="Blue"/>
                 <Member Name="None" Value="0"/>
                 <Member Name="Green"/>
               </EnumType>"#,
            read_enum_type,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "$Kind": "EnumType",
                "$UnderlyingType": "Edm.Int32",
                "$IsFlags": true,
                "Plain": 0,
                "Red": 8,
                "Blue": 1,
                "None": 0,
                "Green": 2
            })
        );
    }

    #[test]
    fn test_member_annotations_do_not_take_numbers() {
        let (_, value) = read(
            r#"<EnumType Name="E">
                 <Annotation Term="Core.Description" String="colors"/>
                 <Member Name="Red"><Annotation Term="Core.Description" String="red"/></Member>
                 <Member Name="Blue"/>
               </EnumType>"#,
            read_enum_type,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "$Kind": "EnumType",
                "@Core.Description": "colors",
                "Red": 0,
                "Red@Core.Description": "red",
                "Blue": 1
            })
        );
    }

    #[test]
    fn test_non_integer_member_value_is_an_error() {
        let err = read(r#"<Member Name="Red" Value="red"/>"#, read_member).unwrap_err();
        assert_eq!(err.to_string(), "invalid Value value: 'red'");
    }

    #[test]
    fn test_entity_type_flags_and_key() {
        let (name, value) = read(
            r#"<EntityType Name="Order" BaseType="Sales.Document" Abstract="false" OpenType="true">
                 <Key>
                   <PropertyRef Name="ID"/>
                   <PropertyRef Name="Customer/ID" Alias="CustomerID"/>
                 </Key>
               </EntityType>"#,
            read_entity_type,
        )
        .unwrap();
        assert_eq!(name, "Order");
        assert_eq!(
            value,
            json!({
                "$Kind": "EntityType",
                "$BaseType": "Sales.Document",
                "$Abstract": false,
                "$OpenType": true,
                "$Key": ["ID", { "CustomerID": "Customer/ID" }]
            })
        );
    }

    #[test]
    fn test_key_requires_property_ref_name() {
        let err = read(r#"<Key><PropertyRef Alias="x"/></Key>"#, read_key).unwrap_err();
        assert!(matches!(
            err,
            ReadError::MissingRequiredAttribute { ref element, attribute: "Name" } if element == "PropertyRef"
        ));
    }

    #[test]
    fn test_complex_type_requires_name() {
        let err = read(r#"<ComplexType/>"#, read_complex_type).unwrap_err();
        assert_eq!(
            err.to_string(),
            "<ComplexType> is missing required attribute 'Name'"
        );
    }

    #[test]
    fn test_type_definition_facets() {
        let (_, value) = read(
            r#"<TypeDefinition Name="Money" UnderlyingType="Edm.Decimal" Precision="18" Scale="variable" MaxLength="max"/>"#,
            read_type_definition,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "$Kind": "TypeDefinition",
                "$UnderlyingType": "Edm.Decimal",
                "$MaxLength": "max",
                "$Precision": 18,
                "$Scale": "variable"
            })
        );
    }
}
