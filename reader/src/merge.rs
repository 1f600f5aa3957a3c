//! Generic child merging.
//!
//! Every container element hands its children to [`merge_children`], which
//! dispatches each one through a closed table of readers and returns the
//! resulting [`NamedResult`]s in document order. Parents then fold that list
//! with their own rules.
//!
//! When a reader leaves its element's children untouched, they are merged
//! here and spliced into the reader's result: members of an aggregate, or
//! flattened siblings named `<parent><child>` next to a scalar.

use roxmltree::Node;
use tracing::trace;

use crate::attribute::{element_children, has_element_children, local_name};
use crate::error::{ReadError, Result};
use crate::expression;
use crate::result::{NamedResult, ReadValue};
use crate::schema::{container, namespace, operation, property, reference, types};

/// A structural reader for one element.
pub(crate) type ReadFn = fn(Node<'_, '_>) -> Result<NamedResult>;

/// How a child element participates in its parent.
#[derive(Clone, Copy)]
pub(crate) enum ChildReader {
    /// A declaration with its own reader.
    Declaration(ReadFn),
    /// An `Annotation` evaluated by the expression grammar.
    Expression,
    /// A wrapper whose children belong to the parent (`DataServices`).
    Transparent,
    /// Recognized but not represented in the output (`Term`).
    Ignored,
}

/// The closed table of child elements valid inside containers.
pub(crate) fn child_reader(tag: &str) -> Option<ChildReader> {
    use ChildReader::{Declaration, Expression, Ignored, Transparent};

    let reader = match tag {
        "Reference" => Declaration(reference::read_reference),
        "Include" => Declaration(reference::read_include),
        "IncludeAnnotations" => Declaration(reference::read_include_annotations),
        "DataServices" => Transparent,
        "Schema" => Declaration(namespace::read_schema),
        "EntityType" => Declaration(types::read_entity_type),
        "ComplexType" => Declaration(types::read_complex_type),
        "EnumType" => Declaration(types::read_enum_type),
        "Member" => Declaration(types::read_member),
        "TypeDefinition" => Declaration(types::read_type_definition),
        "Key" => Declaration(types::read_key),
        "Property" => Declaration(property::read_property),
        "NavigationProperty" => Declaration(property::read_navigation_property),
        "Action" => Declaration(operation::read_action),
        "Function" => Declaration(operation::read_function),
        "ActionImport" => Declaration(operation::read_action_import),
        "FunctionImport" => Declaration(operation::read_function_import),
        "EntityContainer" => Declaration(container::read_entity_container),
        "EntitySet" => Declaration(container::read_entity_set),
        "Singleton" => Declaration(container::read_singleton),
        "NavigationPropertyBinding" => Declaration(container::read_navigation_property_binding),
        "Annotation" => Expression,
        "Term" => Ignored,
        _ => return None,
    };
    Some(reader)
}

/// Reads every child element of `elem` in document order.
pub(crate) fn merge_children(elem: Node<'_, '_>) -> Result<Vec<NamedResult>> {
    let mut results = Vec::new();
    for child in element_children(elem) {
        merge_child(child, &mut results)?;
    }
    Ok(results)
}

/// Reads one child element and appends its results.
pub(crate) fn merge_child(child: Node<'_, '_>, results: &mut Vec<NamedResult>) -> Result<()> {
    let tag = local_name(child);
    let reader = child_reader(tag).ok_or_else(|| ReadError::UnknownElement(tag.to_string()))?;
    trace!(tag, name = ?child.attribute("Name"), "Merging child element");

    match reader {
        ChildReader::Ignored => {}
        ChildReader::Transparent => results.extend(merge_children(child)?),
        ChildReader::Expression => results.extend(expression::evaluate(child)?),
        ChildReader::Declaration(read) => {
            let result = read(child)?;
            if result.children_consumed || !has_element_children(child) {
                results.push(result);
            } else {
                let grandchildren = merge_children(child)?;
                splice(result, grandchildren, results);
            }
        }
    }
    Ok(())
}

/// Attaches results a reader did not consume to that reader's result.
fn splice(mut result: NamedResult, children: Vec<NamedResult>, results: &mut Vec<NamedResult>) {
    match &mut result.value {
        ReadValue::Aggregate(map) => {
            for child in children {
                let (name, value) = child.into_entry();
                map.insert(name, value);
            }
            results.push(result);
        }
        ReadValue::Scalar(_) => {
            let prefix = result.name.clone();
            results.push(result);
            results.extend(children.into_iter().map(|child| child.prefixed(&prefix)));
        }
    }
}
