//! Homogeneous arrays and fetched record collections.

use serde::de::DeserializeOwned;

use super::FromValue;
use crate::error::{SurrealError, SurrealResult};
use crate::value::Value;

fn elements<'a>(expected: &'static str, value: &'a Value) -> SurrealResult<&'a [Value]> {
    value
        .as_array()
        .ok_or_else(|| SurrealError::decode(expected, value.kind()))
}

/// Array whose elements are all strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringArray(pub Vec<String>);

impl FromValue for StringArray {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        elements("array of strings", value)?
            .iter()
            .map(|elem| match elem {
                Value::String(s) => Ok(s.clone()),
                other => Err(SurrealError::decode("string element", other.kind())),
            })
            .collect::<SurrealResult<Vec<_>>>()
            .map(StringArray)
    }
}

/// Array whose elements are all integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntArray(pub Vec<i64>);

impl FromValue for IntArray {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        elements("array of integers", value)?
            .iter()
            .map(|elem| match elem {
                Value::Int(i) => Ok(*i),
                other => Err(SurrealError::decode("integer element", other.kind())),
            })
            .collect::<SurrealResult<Vec<_>>>()
            .map(IntArray)
    }
}

/// Array of numbers, widened to `f64`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatArray(pub Vec<f64>);

impl FromValue for FloatArray {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        elements("array of numbers", value)?
            .iter()
            .map(|elem| match elem {
                Value::Int(i) => Ok(*i as f64),
                Value::Float(f) => Ok(*f),
                other => Err(SurrealError::decode("numeric element", other.kind())),
            })
            .collect::<SurrealResult<Vec<_>>>()
            .map(FloatArray)
    }
}

macro_rules! array_newtype {
    ($($name:ident => $elem:ty),*) => {
        $(
            impl std::ops::Deref for $name {
                type Target = Vec<$elem>;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl From<$name> for Value {
                fn from(array: $name) -> Self {
                    Value::from(array.0)
                }
            }
        )*
    };
}

array_newtype!(StringArray => String, IntArray => i64, FloatArray => f64);

/// A collection of records, e.g. the rows of a `FETCH`ed graph edge.
///
/// `null` decodes to an empty collection. Anything else is re-encoded as
/// JSON and deserialized as `Vec<T>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Many<T>(pub Vec<T>);

impl<T> Default for Many<T> {
    fn default() -> Self {
        Many(Vec::new())
    }
}

impl<T> std::ops::Deref for Many<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> IntoIterator for Many<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: DeserializeOwned> FromValue for Many<T> {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        if value.is_null() {
            return Ok(Many(Vec::new()));
        }
        serde_json::from_value(value.to_json())
            .map(Many)
            .map_err(|e| SurrealError::decode("collection of records", e.to_string()))
    }
}

/// A single fetched record, e.g. a `FETCH`ed record link.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T>(pub T);

impl<T> Record<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromValue for Record<T> {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        serde_json::from_value(value.to_json())
            .map(Record)
            .map_err(|e| SurrealError::decode("record", e.to_string()))
    }
}
