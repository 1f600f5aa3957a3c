//! Structural declaration readers.
//!
//! Each reader projects its element's attributes into a `$Kind`-tagged
//! object and either merges its children itself (setting
//! `children_consumed`) or leaves them to the merge engine.

pub(crate) mod container;
pub(crate) mod namespace;
pub(crate) mod operation;
pub(crate) mod property;
pub(crate) mod reference;
pub(crate) mod types;

use csdl_core::{CsdlKind, KIND_KEY};
use serde_json::{Map, Value};

/// A new declaration object carrying only its `$Kind`.
pub(crate) fn declaration(kind: CsdlKind) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(KIND_KEY.into(), Value::from(kind.as_str()));
    map
}
