//! Deterministic, stable-key-order serialization (spec §4.2's
//! `countObject`): a plain `serde_json::to_string` is not guaranteed to
//! sort object keys, so we walk the value and rebuild it with a
//! `BTreeMap` at every object level before serializing.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

fn sort_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_value(v))).collect();
            let mut out = serde_json::Map::new();
            for (k, v) in sorted {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_value).collect()),
        other => other,
    }
}

/// Render `value` as a canonical JSON string: object keys sorted
/// recursively, arrays kept in order.
pub fn canonical_string<T: Serialize>(value: &T) -> String {
    let raw = serde_json::to_value(value).unwrap_or(Value::Null);
    serde_json::to_string(&sort_value(raw)).unwrap_or_default()
}
