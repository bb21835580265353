//! JSON <-> record Value conversion utilities

use crate::Value;

/// Convert serde_json::Value to a record Value
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Nil, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::List(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(obj) => {
            Value::Map(obj.into_iter().map(|(k, v)| (k, json_to_value(v))).collect())
        }
    }
}

/// Convert a record Value to serde_json::Value.
///
/// JSON has no byte type, so bytes become a lower-case hex string. Non-finite
/// floats become `null`.
pub fn value_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Nil => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Int(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        bytes @ Value::Bytes(_) => serde_json::Value::String(bytes.to_display_string()),
        Value::List(items) => serde_json::Value::Array(items.into_iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(json_to_value(json!(3)), Value::Int(3));
        assert_eq!(json_to_value(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn bytes_render_as_hex() {
        assert_eq!(value_to_json(Value::Bytes(vec![0x01, 0xab])), json!("01ab"));
    }

    #[test]
    fn objects_round_trip() {
        let input = json!({"name": "fido", "attributes": {"n": 1, "tags": ["a", null]}});
        assert_eq!(value_to_json(json_to_value(input.clone())), input);
    }
}
