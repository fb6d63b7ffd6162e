//! Stored documents and their field maps.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// The fields of a document.
pub type Fields = Map<String, Value>;

/// A document read from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The document id (last path segment).
    pub id: String,
    pub data: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Fields) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// A field value, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// A string field, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Deserializes the fields into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    /// The fields as a JSON object with the id added under `id`.
    pub fn into_json_with_id(self) -> Value {
        let mut data = self.data;
        data.insert("id".to_string(), Value::String(self.id));
        Value::Object(data)
    }
}

/// Serializes a model into document fields; the model must serialize to an object.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Profile {
        name: String,
        #[serde(default)]
        title: String,
    }

    #[test]
    fn decode_tolerates_missing_defaulted_fields() {
        let Value::Object(data) = json!({"name": "Ada", "bio": "ignored"}) else {
            unreachable!()
        };
        let doc = Document::new("ada", data);
        let profile: Profile = doc.decode().unwrap();
        assert_eq!(
            profile,
            Profile {
                name: "Ada".to_string(),
                title: String::new()
            }
        );
    }

    #[test]
    fn json_with_id_adds_the_document_id() {
        let fields = to_fields(&Profile {
            name: "Ada".to_string(),
            title: "Dr".to_string(),
        })
        .unwrap();
        let value = Document::new("ada", fields).into_json_with_id();
        assert_eq!(value, json!({"id": "ada", "name": "Ada", "title": "Dr"}));
    }

    #[test]
    fn non_object_models_are_rejected() {
        assert!(matches!(
            to_fields(&vec![1, 2]),
            Err(StoreError::Serialization(_))
        ));
    }
}
