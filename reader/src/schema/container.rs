//! Entity containers and their sets and singletons.

use csdl_core::CsdlKind;
use roxmltree::Node;
use serde_json::{Map, Value};

use super::declaration;
use super::types::insert_all;
use crate::attribute::{boolean, project, required, text};
use crate::error::Result;
use crate::merge::merge_children;
use crate::result::NamedResult;

pub(crate) fn read_entity_container(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::EntityContainer);
    project(elem, &mut result, "Extends", text)?;

    insert_all(&mut result, merge_children(elem)?);
    Ok(NamedResult::aggregate(name, Some(CsdlKind::EntityContainer), result).consumed())
}

pub(crate) fn read_entity_set(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::EntitySet);
    result.insert("$Type".into(), Value::from(required(elem, "EntityType")?));
    project(elem, &mut result, "IncludeInServiceDocument", boolean)?;

    fold_bindings(elem, &mut result)?;
    Ok(NamedResult::aggregate(name, Some(CsdlKind::EntitySet), result).consumed())
}

pub(crate) fn read_singleton(elem: Node<'_, '_>) -> Result<NamedResult> {
    let name = required(elem, "Name")?;
    let mut result = declaration(CsdlKind::Singleton);
    result.insert("$Type".into(), Value::from(required(elem, "Type")?));

    fold_bindings(elem, &mut result)?;
    Ok(NamedResult::aggregate(name, Some(CsdlKind::Singleton), result).consumed())
}

/// Annotations attach to the set itself; bindings go into
/// `$NavigationPropertyBinding`, which is only written when non-empty.
fn fold_bindings(elem: Node<'_, '_>, target: &mut Map<String, Value>) -> Result<()> {
    let mut bindings = Map::new();
    for item in merge_children(elem)? {
        let (name, value) = item.into_entry();
        if name.starts_with('@') {
            target.insert(name, value);
        } else {
            bindings.insert(name, value);
        }
    }
    if !bindings.is_empty() {
        target.insert("$NavigationPropertyBinding".into(), Value::Object(bindings));
    }
    Ok(())
}

/// A binding is the target path, keyed by the navigation property path.
pub(crate) fn read_navigation_property_binding(elem: Node<'_, '_>) -> Result<NamedResult> {
    let path = required(elem, "Path")?;
    let target = required(elem, "Target")?;
    Ok(NamedResult::scalar(path, None, Value::from(target)))
}
