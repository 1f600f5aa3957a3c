//! Actions, functions and their container imports.

use csdl_core::CsdlKind;
use roxmltree::Node;
use serde_json::{Map, Value};

use super::declaration;
use super::property::type_reference;
use super::types::insert_all;
use crate::attribute::{boolean, element_children, local_name, project, required, text};
use crate::error::{ReadError, Result};
use crate::expression;
use crate::merge::merge_children;
use crate::result::NamedResult;

pub(crate) fn read_action(elem: Node<'_, '_>) -> Result<NamedResult> {
    read_operation(elem, CsdlKind::Action)
}

pub(crate) fn read_function(elem: Node<'_, '_>) -> Result<NamedResult> {
    read_operation(elem, CsdlKind::Function)
}

/// One overload. The namespace groups overloads sharing a name into an
/// array.
fn read_operation(elem: Node<'_, '_>, kind: CsdlKind) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(kind);
    project(elem, &mut result, "IsBound", boolean)?;
    project(elem, &mut result, "EntitySetPath", text)?;
    if kind == CsdlKind::Function {
        project(elem, &mut result, "IsComposable", boolean)?;
    }

    let mut parameters = Vec::new();
    for child in element_children(elem) {
        match local_name(child) {
            "ReturnType" => {
                let mut return_type = Map::new();
                type_reference(child, &mut return_type)?;
                insert_all(&mut return_type, merge_children(child)?);
                result.insert("$ReturnType".into(), Value::Object(return_type));
            }
            "Parameter" => {
                let mut parameter = Map::new();
                parameter.insert("$Name".into(), Value::from(required(child, "Name")?));
                type_reference(child, &mut parameter)?;
                insert_all(&mut parameter, merge_children(child)?);
                parameters.push(Value::Object(parameter));
            }
            "Annotation" => insert_all(&mut result, expression::evaluate(child)?),
            other => return Err(ReadError::UnknownElement(other.to_string())),
        }
    }
    if !parameters.is_empty() {
        result.insert("$Parameter".into(), Value::Array(parameters));
    }

    Ok(NamedResult::aggregate(name, Some(kind), result).consumed())
}

pub(crate) fn read_action_import(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::ActionImport);
    result.insert("$Action".into(), Value::from(required(elem, "Action")?));
    project(elem, &mut result, "EntitySet", text)?;

    Ok(NamedResult::aggregate(name, Some(CsdlKind::ActionImport), result))
}

pub(crate) fn read_function_import(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::FunctionImport);
    result.insert("$Function".into(), Value::from(required(elem, "Function")?));
    project(elem, &mut result, "EntitySet", text)?;
    project(elem, &mut result, "IncludeInServiceDocument", boolean)?;

    Ok(NamedResult::aggregate(name, Some(CsdlKind::FunctionImport), result))
}
