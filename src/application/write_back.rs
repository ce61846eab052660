//! Grafting sanitized values back onto caller-owned request data.
//!
//! Arrays are cleared and refilled, so the caller's container keeps its
//! identity. Objects are merged by default: surviving keys overwrite the
//! original ones, keys the walker dropped are left as they were. Use
//! [`WriteBackMode::Replace`] to make dropped keys disappear as well.

use serde_json::Value;

use crate::domain::value_objects::WriteBackMode;

/// Whether a request slot takes part in sanitization at all
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Write `cleaned` into `original` in place.
///
/// Values other than arrays and objects are never touched.
pub fn write_back(original: &mut Value, cleaned: Option<Value>, mode: WriteBackMode) {
    match original {
        Value::Array(items) => {
            items.clear();
            if let Some(Value::Array(cleaned)) = cleaned {
                items.extend(cleaned);
            }
        }
        Value::Object(map) => match (mode, cleaned) {
            (WriteBackMode::Merge, Some(Value::Object(cleaned))) => {
                for (key, value) in cleaned {
                    map.insert(key, value);
                }
            }
            (WriteBackMode::Merge, _) => {}
            (WriteBackMode::Replace, Some(Value::Object(cleaned))) => *map = cleaned,
            (WriteBackMode::Replace, _) => map.clear(),
        },
        _ => {}
    }
}
