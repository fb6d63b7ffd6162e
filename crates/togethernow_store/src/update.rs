//! Field-level updates and server-side transforms.

use crate::document::Fields;
use crate::query::compare_values;
use serde_json::Value;
use std::cmp::Ordering;

/// How `set` treats fields that are not part of the new data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Replace the whole document.
    Overwrite,
    /// Only write the given top-level fields, keep the rest.
    Merge,
}

/// One change applied by `DocumentStore::update`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Replace the field value.
    Set { field: String, value: Value },
    /// Append each element not already present.
    ArrayUnion { field: String, elements: Vec<Value> },
    /// Remove every occurrence of each element.
    ArrayRemove { field: String, elements: Vec<Value> },
    /// Add to a numeric field; a missing or non-numeric field becomes `by`.
    Increment { field: String, by: i64 },
}

impl FieldUpdate {
    pub fn set(field: &str, value: impl Into<Value>) -> Self {
        FieldUpdate::Set {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn array_union(field: &str, elements: Vec<Value>) -> Self {
        FieldUpdate::ArrayUnion {
            field: field.to_string(),
            elements,
        }
    }

    pub fn array_remove(field: &str, elements: Vec<Value>) -> Self {
        FieldUpdate::ArrayRemove {
            field: field.to_string(),
            elements,
        }
    }

    pub fn increment(field: &str, by: i64) -> Self {
        FieldUpdate::Increment {
            field: field.to_string(),
            by,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            FieldUpdate::Set { field, .. }
            | FieldUpdate::ArrayUnion { field, .. }
            | FieldUpdate::ArrayRemove { field, .. }
            | FieldUpdate::Increment { field, .. } => field,
        }
    }

    /// Applies the change to a document's fields in place.
    pub fn apply(&self, data: &mut Fields) {
        match self {
            FieldUpdate::Set { field, value } => {
                data.insert(field.clone(), value.clone());
            }
            FieldUpdate::ArrayUnion { field, elements } => {
                let mut items = match data.remove(field) {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                for element in elements {
                    if !items
                        .iter()
                        .any(|item| compare_values(item, element) == Ordering::Equal)
                    {
                        items.push(element.clone());
                    }
                }
                data.insert(field.clone(), Value::Array(items));
            }
            FieldUpdate::ArrayRemove { field, elements } => {
                let mut items = match data.remove(field) {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                items.retain(|item| {
                    !elements
                        .iter()
                        .any(|element| compare_values(item, element) == Ordering::Equal)
                });
                data.insert(field.clone(), Value::Array(items));
            }
            FieldUpdate::Increment { field, by } => {
                let next = match data.get(field) {
                    Some(Value::Number(n)) => match n.as_i64() {
                        Some(current) => Value::from(current.saturating_add(*by)),
                        None => Value::from(n.as_f64().unwrap_or_default() + *by as f64),
                    },
                    _ => Value::from(*by),
                };
                data.insert(field.clone(), next);
            }
        }
    }
}
