//! Wire and storage types for the todo store.
//!
//! Request payloads use [`Field`] so a handler can tell an omitted field from
//! one that was sent with the wrong JSON type.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub message: String,
    pub completed: bool,
}

/// The full list as returned by every operation, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub todos: Vec<TodoItem>,
}

/// A request field that may be missing or carry a value of the wrong type.
#[derive(Clone, Debug, PartialEq)]
pub enum Field<T> {
    Absent,
    Valid(T),
    /// Present, but not decodable as `T`. Holds the raw value.
    Invalid(Value),
}

impl<T> Field<T> {
    pub fn valid(self) -> Option<T> {
        match self {
            Field::Valid(value) => Some(value),
            Field::Absent | Field::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Field::Invalid(_))
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Valid(value)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if let Ok(value) = T::deserialize(&raw) {
            return Ok(Field::Valid(value));
        }
        // `1.7e12` and `5.0` name the same id as `1700000000000` and `5`.
        match integral(&raw).map(|int| T::deserialize(&int)) {
            Some(Ok(value)) => Ok(Field::Valid(value)),
            _ => Ok(Field::Invalid(raw)),
        }
    }
}

/// A float with no fractional part, as an integer `Value`.
fn integral(raw: &Value) -> Option<Value> {
    let float = raw.as_f64().filter(|_| raw.is_f64())?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then(|| Value::from(float as i64))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    pub message: Field<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub id: Field<i64>,
    pub message: Field<String>,
    pub completed: Field<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteRequest {
    pub id: Field<i64>,
}
