//! Conversion from wire values into Rust types.
//!
//! Every decoder is a total match over [`Value`]; variants it does not
//! accept are rejected with [`SurrealError::Decode`].

pub mod arrays;
pub mod ids;
pub mod temporal;

pub use arrays::{FloatArray, IntArray, Many, Record, StringArray};
pub use ids::{AutoId, RecordId, RecordUuid};
pub use temporal::StoreTime;

use crate::error::{SurrealError, SurrealResult};
use crate::value::Value;

/// Trait for converting a wire value into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> SurrealResult<Self>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> SurrealResult<T> {
    Err(SurrealError::decode(expected, value.kind()))
}

// ==================== Passthrough ====================

impl FromValue for Value {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        Ok(value.to_json())
    }
}

// ==================== Scalars ====================

impl FromValue for String {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => mismatch("string", other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => mismatch("bool", other),
        }
    }
}

macro_rules! int_from_value {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value) -> SurrealResult<Self> {
                    match value {
                        Value::Int(i) => <$t>::try_from(*i).map_err(|_| {
                            SurrealError::decode(stringify!($t), format!("out of range integer {}", i))
                        }),
                        other => mismatch(stringify!($t), other),
                    }
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, u8, u16, u32, isize, usize);

/// Smallest float above `i64::MAX`; the wire carries larger unsigned
/// integers as rounded floats.
const U64_BEYOND_I64: f64 = 9_223_372_036_854_775_808.0;

impl FromValue for u64 {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::Int(i) => u64::try_from(*i)
                .map_err(|_| SurrealError::decode("u64", format!("out of range integer {}", i))),
            Value::Float(f) if *f >= U64_BEYOND_I64 && f.fract() == 0.0 => Err(
                SurrealError::decode("u64", format!("u64 beyond i64 range ({}, rounded on the wire)", f)),
            ),
            other => mismatch("u64", other),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            other => mismatch("f64", other),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        let wide = f64::from_value(value).map_err(|_| SurrealError::decode("f32", value.kind()))?;
        let narrow = wide as f32;
        if wide.is_finite() && !narrow.is_finite() {
            return Err(SurrealError::decode("f32", format!("out of range float {}", wide)));
        }
        Ok(narrow)
    }
}

// ==================== Containers ====================

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            other => mismatch("array", other),
        }
    }
}

// ==================== Foreign types ====================

impl FromValue for uuid::Uuid {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::String(s) => uuid::Uuid::parse_str(s)
                .map_err(|e| SurrealError::decode("uuid", e.to_string())),
            other => mismatch("uuid", other),
        }
    }
}

impl FromValue for chrono::DateTime<chrono::FixedOffset> {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        StoreTime::from_value(value).map(StoreTime::into_inner)
    }
}

impl FromValue for chrono::DateTime<chrono::Utc> {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        StoreTime::from_value(value).map(|t| t.into_inner().with_timezone(&chrono::Utc))
    }
}
