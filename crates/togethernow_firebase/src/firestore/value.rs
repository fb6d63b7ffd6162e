//! Conversion between plain JSON and Firestore's typed `Value` encoding.
//!
//! Integers travel as strings (`{"integerValue": "3"}`). Timestamps and
//! references written by other clients are read back as their string form.

use serde_json::{json, Map, Value};
use togethernow_store::Fields;

use crate::error::FirebaseError;

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

pub fn decode_value(value: &Value) -> Result<Value, FirebaseError> {
    let (kind, inner) = value
        .as_object()
        .and_then(|m| m.iter().next())
        .ok_or_else(|| FirebaseError::InvalidResponse(format!("untyped value {}", value)))?;

    let decoded = match (kind.as_str(), inner) {
        ("nullValue", _) => Value::Null,
        ("booleanValue", v) => Value::Bool(v.as_bool().unwrap_or_default()),
        ("integerValue", v) => {
            let parsed = match v {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| FirebaseError::InvalidResponse(format!("bad integer {}", v)))?
        }
        ("doubleValue", v) => v.as_f64().map(Value::from).unwrap_or(Value::Null),
        ("stringValue", v) | ("timestampValue", v) | ("referenceValue", v) | ("bytesValue", v) => {
            Value::String(v.as_str().unwrap_or_default().to_string())
        }
        ("geoPointValue", v) => v.clone(),
        ("arrayValue", v) => {
            let values = match v.get("values").and_then(Value::as_array) {
                Some(values) => values.iter().map(decode_value).collect::<Result<_, _>>()?,
                None => Vec::new(),
            };
            Value::Array(values)
        }
        ("mapValue", v) => Value::Object(decode_fields(v.get("fields"))?),
        (other, _) => {
            return Err(FirebaseError::InvalidResponse(format!(
                "unsupported value type {}",
                other
            )))
        }
    };
    Ok(decoded)
}

/// Decodes a `fields` object; an absent one is an empty document.
pub fn decode_fields(fields: Option<&Value>) -> Result<Fields, FirebaseError> {
    let mut out = Map::new();
    if let Some(Value::Object(map)) = fields {
        for (key, value) in map {
            out.insert(key.clone(), decode_value(value)?);
        }
    }
    Ok(out)
}

/// Quotes a field name for use in a field path or update mask.
pub fn quote_field_path(field: &str) -> String {
    let simple = field
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
