//! JSON serialization of node trees.
//!
//! Every node becomes an object carrying its lowercased type name under
//! `"type"` alongside its schema fields; sequences become arrays and
//! mappings become objects. Extra attributes are not dumped. Object keys
//! are emitted in sorted order.

use astkit_model::{FieldSlot, Node, Value};

/// Converts a node tree to a JSON value.
#[must_use]
pub fn to_json(node: &Node) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    object.insert(
        "type".to_string(),
        serde_json::Value::String(node.type_name().to_lowercase()),
    );
    for (name, slot) in node.fields() {
        object.insert(name.to_string(), slot_to_json(slot));
    }
    serde_json::Value::Object(object)
}

/// Renders a node tree as pretty-printed JSON with two-space indentation.
#[must_use]
pub fn dump(node: &Node) -> String {
    serde_json::to_string_pretty(&to_json(node)).unwrap_or_default()
}

fn slot_to_json(slot: &FieldSlot) -> serde_json::Value {
    match slot {
        FieldSlot::Value(value) => value_to_json(value),
        FieldSlot::List(list) => {
            serde_json::Value::Array(list.iter().map(value_to_json).collect())
        }
        FieldSlot::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_string(), value_to_json(v)))
                .collect(),
        ),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        // Non-finite floats have no JSON form and dump as null.
        Value::Float(n) => serde_json::Number::from_f64(*n)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), value_to_json(v)))
                .collect(),
        ),
        Value::Node(node) => to_json(node),
    }
}
