//! Recursive traversal applying the string pipeline to every string leaf.

use serde_json::{Map, Value};

use super::transformer::sanitize_string;
use crate::domain::policy::Policy;

/// Build a sanitized copy of `value`.
///
/// Returns `None` when the value itself is dropped (a top-level string the
/// pipeline rejected, or a container beyond `max_depth`).
pub fn clean_value(value: &Value, policy: &Policy) -> Option<Value> {
    walk(value, policy, 0)
}

/// `level` is the number of containers enclosing `value`
fn walk(value: &Value, policy: &Policy, level: usize) -> Option<Value> {
    match value {
        Value::Null => Some(Value::Null),
        Value::String(s) => sanitize_string(s, policy, None).map(Value::String),
        Value::Array(items) => {
            if !policy.sanitize_arrays {
                return Some(value.clone());
            }
            if exceeds_depth(policy, level) {
                tracing::debug!(level, "array beyond max depth dropped");
                return None;
            }
            let cleaned = items
                .iter()
                .filter_map(|item| walk(item, policy, level + 1))
                .collect();
            Some(Value::Array(cleaned))
        }
        Value::Object(map) => {
            if exceeds_depth(policy, level) {
                tracing::debug!(level, "object beyond max depth dropped");
                return None;
            }
            Some(Value::Object(clean_map(map, policy, level + 1)))
        }
        Value::Bool(_) | Value::Number(_) => Some(value.clone()),
    }
}

fn clean_map(map: &Map<String, Value>, policy: &Policy, level: usize) -> Map<String, Value> {
    let mut cleaned = Map::new();

    for (key, value) in map {
        let result = match value {
            Value::String(s) => sanitize_string(s, policy, Some(key)).map(Value::String),
            other => walk(other, policy, level),
        };

        match result {
            Some(v) => {
                cleaned.insert(key.clone(), v);
            }
            None => tracing::debug!(field = %key, "field dropped by sanitizer"),
        }
    }

    cleaned
}

fn exceeds_depth(policy: &Policy, level: usize) -> bool {
    policy.max_depth.is_some_and(|max| level >= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_passes_through() {
        assert_eq!(clean_value(&Value::Null, &Policy::default()), Some(Value::Null));
        assert_eq!(
            clean_value(&json!({"a": null, "b": [null]}), &Policy::default()),
            Some(json!({"a": null, "b": [null]}))
        );
    }

    #[test]
    fn test_scalars_are_not_sanitized() {
        let value = json!({"n": 42, "f": 1.5, "flag": false});
        assert_eq!(clean_value(&value, &Policy::default()), Some(value));
    }

    #[test]
    fn test_nested_object() {
        let policy = Policy::default().with_collapse_whitespace(true);
        let value = json!({"user": {"bio": "<b>hi</b>  there"}});
        assert_eq!(
            clean_value(&value, &policy),
            Some(json!({"user": {"bio": "hi there"}}))
        );
    }

    #[test]
    fn test_dropped_keys_vanish() {
        let value = json!({"name": "Ann", "blank": "   ", "tag": "<br>"});
        assert_eq!(
            clean_value(&value, &Policy::default()),
            Some(json!({"name": "Ann"}))
        );
    }

    #[test]
    fn test_array_elements_are_filtered_in_order() {
        let value = json!(["  a ", "", "<i></i>", "b", 3, {"x": " y "}]);
        assert_eq!(
            clean_value(&value, &Policy::default()),
            Some(json!(["a", "b", 3, {"x": "y"}]))
        );
    }

    #[test]
    fn test_array_elements_carry_no_field_name() {
        let value = json!({"email": ["Foo@Bar.COM"], "other": "Foo@Bar.COM"});
        assert_eq!(
            clean_value(&value, &Policy::default()),
            Some(json!({"email": ["Foo@Bar.COM"], "other": "Foo@Bar.COM"}))
        );
    }

    #[test]
    fn test_arrays_untouched_when_disabled() {
        let policy = Policy::default().with_sanitize_arrays(false);
        let value = json!({"tags": ["  <b>x</b> ", ""], "name": " <b>x</b> "});
        assert_eq!(
            clean_value(&value, &policy),
            Some(json!({"tags": ["  <b>x</b> ", ""], "name": "x"}))
        );
    }

    #[test]
    fn test_top_level_string() {
        assert_eq!(
            clean_value(&json!(" <p>hi</p> "), &Policy::default()),
            Some(json!("hi"))
        );
        assert_eq!(clean_value(&json!("   "), &Policy::default()), None);
    }

    #[test]
    fn test_ignored_field_keeps_raw_value_but_nested_values_are_walked() {
        let policy = Policy::default().with_ignore_field("raw");
        let value = json!({"raw": "<b>x</b>", "nested": {"raw": "<i>y</i>", "z": "<i>z</i>"}});
        assert_eq!(
            clean_value(&value, &policy),
            Some(json!({"raw": "<b>x</b>", "nested": {"raw": "<i>y</i>", "z": "z"}}))
        );
    }

    #[test]
    fn test_depth_guard_drops_deep_containers() {
        let policy = Policy::default().with_max_depth(2);
        let value = json!({"a": {"b": {"c": "deep"}}, "list": [[1]], "s": "ok"});
        assert_eq!(
            clean_value(&value, &policy),
            Some(json!({"a": {}, "list": [], "s": "ok"}))
        );

        let policy = Policy::default().with_max_depth(0);
        assert_eq!(clean_value(&json!({"a": 1}), &policy), None);
        assert_eq!(clean_value(&json!("x"), &policy), Some(json!("x")));
    }

    #[test]
    fn test_input_is_not_modified() {
        let value = json!({"name": " <b>x</b> "});
        let before = value.clone();
        let _ = clean_value(&value, &Policy::default());
        assert_eq!(value, before);
    }
}
