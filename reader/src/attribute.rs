//! Typed attribute projection and small element helpers.
//!
//! Structural readers copy XML attributes into `$`-prefixed members of the
//! object they are building. An absent attribute leaves the target
//! untouched, so defaults written by the caller survive.

use roxmltree::Node;
use serde_json::{Map, Value};

use crate::error::{ReadError, Result};

/// Converts a raw attribute value; receives the attribute name for errors.
pub(crate) type Convert = fn(&str, &str) -> Result<Value>;

/// Copies `attr` into `target["$" + attr]` if the element carries it.
pub(crate) fn project(
    elem: Node<'_, '_>,
    target: &mut Map<String, Value>,
    attr: &str,
    convert: Convert,
) -> Result<()> {
    project_as(elem, target, attr, &format!("${attr}"), convert)
}

/// Copies `attr` into `target[key]` if the element carries it.
pub(crate) fn project_as(
    elem: Node<'_, '_>,
    target: &mut Map<String, Value>,
    attr: &str,
    key: &str,
    convert: Convert,
) -> Result<()> {
    if let Some(raw) = elem.attribute(attr) {
        target.insert(key.to_string(), convert(attr, raw)?);
    }
    Ok(())
}

/// Identity conversion.
pub(crate) fn text(_attr: &str, raw: &str) -> Result<Value> {
    Ok(Value::from(raw))
}

/// Integer conversion.
pub(crate) fn integer(attr: &str, raw: &str) -> Result<Value> {
    raw.trim()
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| ReadError::invalid_literal(attr, raw))
}

/// Boolean conversion accepting exactly `true` or `false`.
pub(crate) fn boolean(attr: &str, raw: &str) -> Result<Value> {
    parse_bool(attr, raw).map(Value::Bool)
}

/// Facet conversion: an integer when the text is one, otherwise the raw
/// keyword (`variable`, `floating`, `max`).
pub(crate) fn facet(_attr: &str, raw: &str) -> Result<Value> {
    Ok(raw
        .trim()
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw)))
}

pub(crate) fn parse_bool(tag: &str, raw: &str) -> Result<bool> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ReadError::invalid_literal(tag, raw)),
    }
}

/// Returns an attribute the construct cannot be read without.
pub(crate) fn required<'a>(elem: Node<'a, '_>, attr: &'static str) -> Result<&'a str> {
    elem.attribute(attr)
        .ok_or_else(|| ReadError::MissingRequiredAttribute {
            element: local_name(elem).to_string(),
            attribute: attr,
        })
}

/// `Nullable` defaults to `true`; any casing of `true` counts as true.
pub(crate) fn nullable(elem: Node<'_, '_>) -> bool {
    elem.attribute("Nullable")
        .is_none_or(|v| v.eq_ignore_ascii_case("true"))
}

/// Local (unprefixed) tag name of an element.
pub(crate) fn local_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Element children in document order; text and comments are skipped.
pub(crate) fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

pub(crate) fn has_element_children(node: Node<'_, '_>) -> bool {
    element_children(node).next().is_some()
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
