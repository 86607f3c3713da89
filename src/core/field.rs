//! Field value types and comparison semantics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

/// The scalar type of a persisted field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    String,
    Integer,
    Float,
    Boolean,
    Uuid,
    DateTime,
}

impl ScalarType {
    /// Whether values of this type have a meaningful `<` / `>` ordering
    pub fn is_ordered(&self) -> bool {
        !matches!(self, ScalarType::Boolean)
    }

    /// Whether values of this type are text (LIKE and UPPER apply)
    pub fn is_textual(&self) -> bool {
        matches!(self, ScalarType::String)
    }
}

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The scalar type carried by this value, `None` for null
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            FieldValue::String(_) => Some(ScalarType::String),
            FieldValue::Integer(_) => Some(ScalarType::Integer),
            FieldValue::Float(_) => Some(ScalarType::Float),
            FieldValue::Boolean(_) => Some(ScalarType::Boolean),
            FieldValue::Uuid(_) => Some(ScalarType::Uuid),
            FieldValue::DateTime(_) => Some(ScalarType::DateTime),
            FieldValue::Null => None,
        }
    }

    /// Upper-case a string value; other values are returned unchanged
    pub fn to_uppercase(&self) -> FieldValue {
        match self {
            FieldValue::String(s) => FieldValue::String(s.to_uppercase()),
            other => other.clone(),
        }
    }

    /// Compare two values with SQL semantics.
    ///
    /// Returns `None` when either side is null or the types are not
    /// comparable. Integers and floats compare numerically.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Read a JSON value as the given scalar type.
    ///
    /// Anything that does not fit the declared type reads as `Null`.
    pub fn from_json(value: &Value, ty: ScalarType) -> FieldValue {
        let read = match ty {
            ScalarType::String => value.as_str().map(|s| FieldValue::String(s.to_string())),
            ScalarType::Integer => value.as_i64().map(FieldValue::Integer),
            ScalarType::Float => value.as_f64().map(FieldValue::Float),
            ScalarType::Boolean => value.as_bool().map(FieldValue::Boolean),
            ScalarType::Uuid => value
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .map(FieldValue::Uuid),
            ScalarType::DateTime => value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc))),
        };
        read.unwrap_or(FieldValue::Null)
    }

    /// Convert the value to JSON in the same shape serde gives entity fields
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Uuid(u) => Value::String(u.to_string()),
            FieldValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
            FieldValue::Null => Value::Null,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::String(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}
