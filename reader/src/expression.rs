//! Dynamic expression evaluation.
//!
//! Annotation values use a closed, mutually recursive grammar: records,
//! collections, labeled elements, casts, `Apply`, logical and arithmetic
//! operators, and the constant literals of [`crate::literal`]. Every node
//! evaluates to one or more [`NamedResult`]s; most yield exactly one,
//! `PropertyValue` yields one per value it carries.
//!
//! Annotations nested inside an operator, `Apply` or `LabeledElement`
//! become `@`-prefixed members of the resulting object rather than
//! operands.

use csdl_core::{AnnotationName, CsdlKind};
use roxmltree::{Attribute, Node};
use serde_json::{Map, Value};
use tracing::trace;

use crate::attribute::{element_children, facet, local_name, required, text_content};
use crate::error::{ReadError, Result};
use crate::literal::{self, LiteralTag};
use crate::result::{NamedResult, ReadValue};

/// Operators whose operands are collected into a `$<Op>` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Has,
    In,
    Add,
    Sub,
    Neg,
    Mul,
    Div,
    DivBy,
    Mod,
    If,
    UrlRef,
}

impl Operator {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "And" => Self::And,
            "Or" => Self::Or,
            "Not" => Self::Not,
            "Eq" => Self::Eq,
            "Ne" => Self::Ne,
            "Gt" => Self::Gt,
            "Ge" => Self::Ge,
            "Lt" => Self::Lt,
            "Le" => Self::Le,
            "Has" => Self::Has,
            "In" => Self::In,
            "Add" => Self::Add,
            "Sub" => Self::Sub,
            "Neg" => Self::Neg,
            "Mul" => Self::Mul,
            "Div" => Self::Div,
            "DivBy" => Self::DivBy,
            "Mod" => Self::Mod,
            "If" => Self::If,
            "UrlRef" => Self::UrlRef,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "And",
            Self::Or => "Or",
            Self::Not => "Not",
            Self::Eq => "Eq",
            Self::Ne => "Ne",
            Self::Gt => "Gt",
            Self::Ge => "Ge",
            Self::Lt => "Lt",
            Self::Le => "Le",
            Self::Has => "Has",
            Self::In => "In",
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Neg => "Neg",
            Self::Mul => "Mul",
            Self::Div => "Div",
            Self::DivBy => "DivBy",
            Self::Mod => "Mod",
            Self::If => "If",
            Self::UrlRef => "UrlRef",
        }
    }
}

/// One production of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expression {
    Annotation,
    Collection,
    Record,
    PropertyValue,
    LabeledElement,
    Apply,
    Cast,
    IsOf,
    Operator(Operator),
    Literal(LiteralTag),
}

impl Expression {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Annotation" => Some(Self::Annotation),
            "Collection" => Some(Self::Collection),
            "Record" => Some(Self::Record),
            "PropertyValue" => Some(Self::PropertyValue),
            "LabeledElement" => Some(Self::LabeledElement),
            "Apply" => Some(Self::Apply),
            "Cast" => Some(Self::Cast),
            "IsOf" => Some(Self::IsOf),
            _ => Operator::from_tag(tag)
                .map(Self::Operator)
                .or_else(|| LiteralTag::from_tag(tag).map(Self::Literal)),
        }
    }
}

/// Evaluates an expression element.
///
/// # Errors
///
/// Returns [`ReadError::UnknownElement`] for tags outside the grammar.
pub fn evaluate(node: Node<'_, '_>) -> Result<Vec<NamedResult>> {
    let tag = local_name(node);
    let expression =
        Expression::from_tag(tag).ok_or_else(|| ReadError::UnknownElement(tag.to_string()))?;
    trace!(tag, "Evaluating expression");

    match expression {
        Expression::Annotation => read_annotation(node),
        Expression::PropertyValue => read_property_value(node),
        Expression::Collection => read_collection(node),
        Expression::Record => single(read_record(node)),
        Expression::LabeledElement => single(read_labeled_element(node)),
        Expression::Apply => single(read_apply(node)),
        Expression::Cast | Expression::IsOf => single(read_cast(node)),
        Expression::Operator(op) => single(read_operator(node, op)),
        Expression::Literal(lit) => {
            let value = literal::evaluate(lit, &text_content(node))?;
            Ok(vec![NamedResult::anonymous(value)])
        }
    }
}

/// Evaluates an attribute shortcut such as `Int="42"` or `Path="Name"`.
///
/// Only constant literal tags are valid in attribute position.
pub fn evaluate_attribute(attr: &Attribute<'_, '_>) -> Result<NamedResult> {
    let name = attr.name();
    let tag = LiteralTag::from_tag(name).ok_or_else(|| ReadError::UnknownElement(name.to_string()))?;
    literal::evaluate(tag, attr.value()).map(NamedResult::anonymous)
}

fn single(value: Result<Map<String, Value>>) -> Result<Vec<NamedResult>> {
    Ok(vec![NamedResult::anonymous(Value::Object(value?))])
}

/// Evaluates every child element, flattening multi-result children.
fn evaluate_children(elem: Node<'_, '_>) -> Result<Vec<NamedResult>> {
    let mut results = Vec::new();
    for child in element_children(elem) {
        results.extend(evaluate(child)?);
    }
    Ok(results)
}

/// Unqualified attributes other than `skip`, in document order.
fn value_attributes<'a, 'input>(
    elem: Node<'a, 'input>,
    skip: &'static [&'static str],
) -> impl Iterator<Item = Attribute<'a, 'input>> {
    elem.attributes()
        .filter(move |a| a.namespace().is_none() && !skip.iter().any(|s| *s == a.name()))
}

/// Reads an annotation declaration into `@Term[#Qualifier]`.
///
/// Without attributes or children the value is `true`. One value attribute
/// gives its constant, several give an array. An unnamed child result
/// replaces the value. Named results (nested annotations) become members
/// of an object value, or flattened `@Term@Nested` siblings of a scalar.
pub(crate) fn read_annotation(elem: Node<'_, '_>) -> Result<Vec<NamedResult>> {
    let mut name = AnnotationName::new(required(elem, "Term")?);
    if let Some(qualifier) = elem.attribute("Qualifier") {
        name = name.with_qualifier(qualifier);
    }
    let key = name.key();

    let mut from_attrs = value_attributes(elem, &["Term", "Qualifier"])
        .map(|attr| evaluate_attribute(&attr).map(NamedResult::into_value))
        .collect::<Result<Vec<_>>>()?;
    let attr_value = match from_attrs.len() {
        0 => None,
        1 => Some(from_attrs.remove(0)),
        _ => Some(Value::Array(from_attrs)),
    };

    let children = evaluate_children(elem)?;
    let mut flattened = Vec::new();
    let value = if children.is_empty() {
        attr_value.unwrap_or(Value::Bool(true))
    } else {
        let mut body = match attr_value {
            Some(attr_value) => ReadValue::from_value(attr_value),
            None => ReadValue::Aggregate(Map::new()),
        };
        for child in children {
            if !child.is_named() {
                body = child.value;
                continue;
            }
            match &mut body {
                ReadValue::Aggregate(map) => {
                    let (child_name, child_value) = child.into_entry();
                    map.insert(child_name, child_value);
                }
                ReadValue::Scalar(_) => flattened.push(child.prefixed(&key)),
            }
        }
        body.into_value()
    };

    let mut results = vec![NamedResult {
        name: key,
        kind: Some(CsdlKind::Annotation),
        value: ReadValue::from_value(value),
        children_consumed: true,
    }];
    results.extend(flattened);
    Ok(results)
}

fn read_collection(elem: Node<'_, '_>) -> Result<Vec<NamedResult>> {
    let items = evaluate_children(elem)?
        .into_iter()
        .map(NamedResult::into_value)
        .collect();
    Ok(vec![NamedResult::anonymous(Value::Array(items))])
}

fn read_record(elem: Node<'_, '_>) -> Result<Map<String, Value>> {
    let mut record = Map::new();
    for item in evaluate_children(elem)? {
        let (name, value) = item.into_entry();
        record.insert(name, value);
    }
    Ok(record)
}

/// Each value is renamed `<Property><own name>`, so an annotation on the
/// property value surfaces as `Property@Term`.
fn read_property_value(elem: Node<'_, '_>) -> Result<Vec<NamedResult>> {
    let property = required(elem, "Property")?;

    let mut results = value_attributes(elem, &["Property"])
        .map(|attr| evaluate_attribute(&attr))
        .collect::<Result<Vec<_>>>()?;
    results.extend(evaluate_children(elem)?);

    Ok(results
        .into_iter()
        .map(|item| item.prefixed(property))
        .collect())
}

fn read_labeled_element(elem: Node<'_, '_>) -> Result<Map<String, Value>> {
    let label = required(elem, "Name")?;
    let mut result = Map::new();
    result.insert("$LabeledElement".into(), Value::Null);
    result.insert("$Name".into(), Value::from(label));

    let mut items = value_attributes(elem, &["Name"])
        .map(|attr| evaluate_attribute(&attr))
        .collect::<Result<Vec<_>>>()?;
    items.extend(evaluate_children(elem)?);

    for item in items {
        if item.is_annotation() {
            let (name, value) = item.into_entry();
            result.insert(name, value);
        } else {
            result.insert("$LabeledElement".into(), item.into_operand());
        }
    }
    Ok(result)
}

fn read_apply(elem: Node<'_, '_>) -> Result<Map<String, Value>> {
    let function = required(elem, "Function")?;
    let mut result = Map::new();
    result.insert("$Apply".into(), Value::Array(Vec::new()));
    result.insert("$Function".into(), Value::from(function));

    let mut arguments = Vec::new();
    for item in evaluate_children(elem)? {
        if item.is_annotation() {
            let (name, value) = item.into_entry();
            result.insert(name, value);
        } else {
            arguments.push(item.into_operand());
        }
    }
    result.insert("$Apply".into(), Value::Array(arguments));
    Ok(result)
}

/// `Cast` and `IsOf`: attributes become `$`-members (numeric facets as
/// numbers), the tested expression goes under `$Cast`/`$IsOf`.
fn read_cast(elem: Node<'_, '_>) -> Result<Map<String, Value>> {
    let operator = format!("${}", local_name(elem));
    let mut result = Map::new();

    for attr in elem.attributes().filter(|a| a.namespace().is_none()) {
        let value = match attr.name() {
            "MaxLength" | "Precision" | "Scale" | "SRID" => facet(attr.name(), attr.value())?,
            _ => Value::from(attr.value()),
        };
        result.insert(format!("${}", attr.name()), value);
    }

    for item in evaluate_children(elem)? {
        if item.is_named() {
            let (name, value) = item.into_entry();
            result.insert(name, value);
        } else {
            result.insert(operator.clone(), item.into_value());
        }
    }
    Ok(result)
}

/// A single operand is stored bare, any other count as an array.
fn read_operator(elem: Node<'_, '_>, op: Operator) -> Result<Map<String, Value>> {
    let key = format!("${}", op.as_str());
    let mut result = Map::new();
    result.insert(key.clone(), Value::Null);

    let mut operands = Vec::new();
    for item in evaluate_children(elem)? {
        if item.is_annotation() {
            let (name, value) = item.into_entry();
            result.insert(name, value);
        } else {
            operands.push(item.into_operand());
        }
    }

    let value = if operands.len() == 1 {
        operands.remove(0)
    } else {
        Value::Array(operands)
    };
    result.insert(key, value);
    Ok(result)
}
