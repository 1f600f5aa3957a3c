//! Constant literal evaluation.
//!
//! A literal arrives either as an element (`<Int>42</Int>`) or as an
//! attribute shortcut (`Int="42"`); both forms feed the same tag and text
//! into [`evaluate`] and therefore produce identical output.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};

use crate::attribute::parse_bool;
use crate::error::{ReadError, Result};

/// Scalar literal and path expression tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralTag {
    Binary,
    Date,
    Decimal,
    Duration,
    Guid,
    TimeOfDay,
    Path,
    PropertyPath,
    NavigationPropertyPath,
    AnnotationPath,
    ModelElementPath,
    LabeledElementReference,
    DateTimeOffset,
    Int,
    Bool,
    String,
    Null,
    EnumMember,
    Float,
}

impl LiteralTag {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "Binary" => Self::Binary,
            "Date" => Self::Date,
            "Decimal" => Self::Decimal,
            "Duration" => Self::Duration,
            "Guid" => Self::Guid,
            "TimeOfDay" => Self::TimeOfDay,
            "Path" => Self::Path,
            "PropertyPath" => Self::PropertyPath,
            "NavigationPropertyPath" => Self::NavigationPropertyPath,
            "AnnotationPath" => Self::AnnotationPath,
            "ModelElementPath" => Self::ModelElementPath,
            "LabeledElementReference" => Self::LabeledElementReference,
            "DateTimeOffset" => Self::DateTimeOffset,
            "Int" => Self::Int,
            "Bool" => Self::Bool,
            "String" => Self::String,
            "Null" => Self::Null,
            "EnumMember" => Self::EnumMember,
            "Float" => Self::Float,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Date => "Date",
            Self::Decimal => "Decimal",
            Self::Duration => "Duration",
            Self::Guid => "Guid",
            Self::TimeOfDay => "TimeOfDay",
            Self::Path => "Path",
            Self::PropertyPath => "PropertyPath",
            Self::NavigationPropertyPath => "NavigationPropertyPath",
            Self::AnnotationPath => "AnnotationPath",
            Self::ModelElementPath => "ModelElementPath",
            Self::LabeledElementReference => "LabeledElementReference",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Int => "Int",
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Null => "Null",
            Self::EnumMember => "EnumMember",
            Self::Float => "Float",
        }
    }

    /// The `$`-prefixed member key used when the value is wrapped.
    fn key(self) -> String {
        format!("${}", self.as_str())
    }
}

/// Converts literal text to its canonical CSDL-JSON value.
pub fn evaluate(tag: LiteralTag, raw: &str) -> Result<Value> {
    let value = match tag {
        LiteralTag::Binary
        | LiteralTag::Date
        | LiteralTag::Decimal
        | LiteralTag::Duration
        | LiteralTag::Guid
        | LiteralTag::TimeOfDay
        | LiteralTag::Path
        | LiteralTag::PropertyPath
        | LiteralTag::NavigationPropertyPath
        | LiteralTag::AnnotationPath
        | LiteralTag::ModelElementPath
        | LiteralTag::LabeledElementReference => wrap(tag, Value::from(raw)),
        LiteralTag::DateTimeOffset => wrap(tag, Value::from(iso_utc(raw)?)),
        LiteralTag::Int => {
            let n = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ReadError::invalid_literal(tag.as_str(), raw))?;
            wrap(tag, Value::from(n))
        }
        LiteralTag::Bool => Value::Bool(parse_bool(tag.as_str(), raw)?),
        LiteralTag::String => Value::from(raw),
        LiteralTag::Null => wrap(tag, Value::Null),
        LiteralTag::EnumMember => wrap(tag, Value::from(enum_members(raw))),
        LiteralTag::Float => float(raw),
    };
    Ok(value)
}

fn wrap(tag: LiteralTag, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(tag.key(), value);
    Value::Object(map)
}

/// Normalizes a timestamp to UTC with millisecond precision and a `Z`
/// suffix. Timestamps without an offset are taken as UTC.
fn iso_utc(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let utc = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .map_err(|_| ReadError::invalid_literal("DateTimeOffset", raw))?;
    Ok(utc.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

/// `Ns.Type/Red Ns.Type/Striped` becomes `Red,Striped`.
fn enum_members(raw: &str) -> String {
    raw.split_whitespace()
        .map(|path| path.rsplit_once('/').map_or(path, |(_, member)| member))
        .collect::<Vec<_>>()
        .join(",")
}

/// Non-zero finite numbers are emitted bare. Zero, `NaN`, `INF`, `-INF`
/// and unparseable text stay wrapped as `{ "$Float": text }`.
fn float(raw: &str) -> Value {
    match raw.trim().parse::<f64>() {
        Ok(v) if v != 0.0 && v.is_finite() => match Number::from_f64(v) {
            Some(n) => Value::Number(n),
            None => wrap(LiteralTag::Float, Value::from(raw)),
        },
        _ => wrap(LiteralTag::Float, Value::from(raw)),
    }
}
