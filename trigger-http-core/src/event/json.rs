use serde_json::Value;

/// Looks up a JSON pointer, treating an explicit `null` like a missing field.
pub(crate) fn field<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    value.pointer(pointer).filter(|v| !v.is_null())
}

pub(crate) fn field_str<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    field(value, pointer).and_then(Value::as_str)
}

/// Stringifies scalar JSON values. Arrays, objects and null have no string form.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
