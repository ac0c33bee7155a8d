//! Value conversion between the host's dynamic representation and the
//! native collection model.

use dictsync_core::{Changeset, Error, Value};

/// Fixed message prefix for a removal target that is not string-coercible.
pub const KEY_NOT_STRINGABLE: &str = "Dictionary key must be convertible to a string.";

/// Convert a host value into the collection's native representation.
///
/// Integral numbers map to `Int`, all other numbers to `Float`. Arrays and
/// nested objects have no native representation and fail with a conversion
/// error naming `key`.
pub fn to_native(key: &str, value: &serde_json::Value) -> Result<Value, Error> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                // u64 above i64::MAX and nothing representable as f64.
                Err(Error::conversion(key, "number out of range"))
            }
        }
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(_) => Err(Error::conversion(key, "arrays are not supported")),
        serde_json::Value::Object(_) => {
            Err(Error::conversion(key, "nested objects are not supported"))
        }
    }
}

/// Convert the native value back into the host's dynamic representation.
pub fn to_host(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::json!(i),
        Value::Float(f) => serde_json::json!(f),
        Value::String(s) => serde_json::Value::String(s.clone()),
    }
}

/// Coerce a property value into a collection key string.
///
/// The value is converted to its native form and rendered through
/// [`Value`]'s `Display`, the host string form: strings pass through,
/// numbers and booleans render as the host prints them. Null and anything
/// with no native form are not string-coercible and fail with a validation
/// error naming `property`.
pub fn to_key_string(property: &str, value: &serde_json::Value) -> Result<String, Error> {
    match to_native(property, value) {
        Ok(Value::Null) | Err(_) => Err(Error::validation(format!(
            "property '{property}': {KEY_NOT_STRINGABLE}"
        ))),
        Ok(native) => Ok(native.to_string()),
    }
}

/// Marshal a changeset into the host's value representation.
///
/// This is the shape delivered to listener callbacks:
/// `{"insertions": [...], "modifications": [...], "deletions": [...]}`.
pub fn changeset_to_host(changeset: &Changeset) -> serde_json::Value {
    // Changeset is Serialize; key sets become arrays in dispatch order.
    serde_json::to_value(changeset).unwrap_or(serde_json::Value::Null)
}
