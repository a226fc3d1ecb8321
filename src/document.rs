//! Small helpers over the in-memory document tree.
//!
//! Documents are `serde_json::Value` trees built with `preserve_order`, so an
//! object's keys iterate in insertion order, inserting a new key appends it,
//! and mutating an existing key keeps its position.

use serde_json::{Map, Value};

use crate::error::SettingsError;

/// Human-readable name of a node's shape, used in error messages.
pub fn node_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn expect_object(node: &Value) -> Result<&Map<String, Value>, SettingsError> {
    node.as_object().ok_or_else(|| SettingsError::Shape {
        path: String::new(),
        expected: "an object",
        found: node_kind(node),
    })
}

pub(crate) fn expect_array(node: &Value) -> Result<&Vec<Value>, SettingsError> {
    node.as_array().ok_or_else(|| SettingsError::Shape {
        path: String::new(),
        expected: "an array",
        found: node_kind(node),
    })
}

/// Make `node` an object, replacing it with `{}` if it is anything else.
pub(crate) fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

/// Make `node` an array, replacing it with `[]` if it is anything else.
pub(crate) fn ensure_array(node: &mut Value) -> &mut Vec<Value> {
    if !node.is_array() {
        *node = Value::Array(Vec::new());
    }
    match node {
        Value::Array(items) => items,
        _ => unreachable!("node was just replaced with an array"),
    }
}

/// Drop every `null` object member, recursively.
///
/// TOML has no null, so nullable properties without a value are simply left
/// out of the file. Nulls inside arrays are left alone.
#[cfg(feature = "toml")]
pub(crate) fn strip_nulls(node: &mut Value) {
    match node {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                strip_nulls(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_nulls(item);
            }
        }
        _ => {}
    }
}
