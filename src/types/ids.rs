//! Record identifiers.
//!
//! Ids come back as `table:key`. Depending on how the record was created
//! the key is a UUID (`` user:`3f25...` `` or `user:⟨3f25...⟩`), an
//! auto-generated string, or anything else the caller chose.

use once_cell::sync::Lazy;
use regex::Regex;

use super::FromValue;
use crate::error::{SurrealError, SurrealResult};
use crate::value::Value;

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

fn expect_str<'a>(expected: &'static str, value: &'a Value) -> SurrealResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| SurrealError::decode(expected, value.kind()))
}

/// Full record id, passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub String);

impl RecordId {
    /// Table part, before the first `:`.
    pub fn table(&self) -> Option<&str> {
        self.0.split_once(':').map(|(table, _)| table)
    }

    /// Key part, after the first `:`.
    pub fn key(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, key)| key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromValue for RecordId {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        expect_str("record id", value).map(|s| RecordId(s.to_string()))
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::String(id.0)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// UUID extracted from a record id such as `` user:`<uuid>` ``.
///
/// The first lowercase 8-4-4-4-12 group in the string is used, whatever
/// punctuation surrounds it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordUuid(pub uuid::Uuid);

impl RecordUuid {
    pub fn parse(s: &str) -> SurrealResult<Self> {
        let found = UUID_RE
            .find(s)
            .ok_or_else(|| SurrealError::decode("record id containing a uuid", s))?;
        uuid::Uuid::parse_str(found.as_str())
            .map(RecordUuid)
            .map_err(|e| SurrealError::decode("uuid", e.to_string()))
    }

    pub fn uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl FromValue for RecordUuid {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        RecordUuid::parse(expect_str("record id containing a uuid", value)?)
    }
}

impl From<RecordUuid> for Value {
    fn from(id: RecordUuid) -> Self {
        Value::String(id.0.to_string())
    }
}

/// Key of an auto-generated record id: `post:42` → `42`.
///
/// Only the segment after the first `:` is kept; further `:`-separated
/// segments are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AutoId(pub String);

impl AutoId {
    pub fn parse(s: &str) -> SurrealResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 {
            return Err(SurrealError::decode("table:key record id", s));
        }
        Ok(AutoId(parts[1].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromValue for AutoId {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        AutoId::parse(expect_str("table:key record id", value)?)
    }
}

impl From<AutoId> for Value {
    fn from(id: AutoId) -> Self {
        Value::String(id.0)
    }
}

impl std::fmt::Display for AutoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
