use serde_json::{Map, Value};

/// Parse a raw query string into an object of strings.
///
/// Repeated keys collect into an array in order of appearance.
pub fn parse_query(raw: &str) -> Result<Value, serde_urlencoded::de::Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)?;
    let mut map = Map::new();

    for (key, value) in pairs {
        let value = Value::String(value);
        match map.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }

    Ok(Value::Object(map))
}

/// Encode an object back into a query string.
///
/// Arrays expand into repeated keys; nested objects are emitted as JSON text.
pub fn encode_query(value: &Value) -> Result<String, serde_urlencoded::ser::Error> {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if let Value::Object(map) = value {
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    pairs.extend(items.iter().map(|item| (key.as_str(), scalar_text(item))))
                }
                other => pairs.push((key.as_str(), scalar_text(other))),
            }
        }
    }

    serde_urlencoded::to_string(pairs)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
