use std::sync::Arc;

use serde_json::{Number, Value};

/// A single value in a record's property mapping.
///
/// Joined attributes are always `Number`; a NaN number marks missing data.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Number(f64),
    Text(Arc<str>),
    Bool(bool),
    Null,
}

impl Property {
    /// Numeric view of the property. Anything that is not a number reads as NaN.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self {
            Property::Number(v) => *v,
            _ => f64::NAN,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert from a JSON property value. Nested arrays/objects are kept as their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Property::Null,
            Value::Bool(b) => Property::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Property::Null, Property::Number),
            Value::String(s) => Property::Text(Arc::from(s.as_str())),
            other => Property::Text(Arc::from(other.to_string())),
        }
    }

    /// Convert to JSON. Non-finite numbers have no JSON form and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Property::Number(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            Property::Text(s) => Value::String(s.to_string()),
            Property::Bool(b) => Value::Bool(*b),
            Property::Null => Value::Null,
        }
    }
}

impl From<f64> for Property {
    fn from(v: f64) -> Self { Property::Number(v) }
}

impl From<&str> for Property {
    fn from(s: &str) -> Self { Property::Text(Arc::from(s)) }
}
