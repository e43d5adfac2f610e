//! Result rows and scanning into typed destinations.
//!
//! The store returns row fields in alphabetical order no matter how the
//! query listed them, so [`Rows::columns`] and positional [`Rows::scan`]
//! use that canonical order:
//!
//! ```text
//! SELECT id, name, ->posted AS posted, ->posted->post AS posts FROM user
//! columns(): ["id", "name", "posted", "posts"]
//! ```
//!
//! Scans are all-or-nothing: every slot is decoded before any destination
//! is written.

use std::any::Any;

use crate::error::{SurrealError, SurrealResult};
use crate::types::FromValue;
use crate::value::Value;

/// One result row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    value: Value,
}

impl Row {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Column names in canonical order. Empty for non-document rows.
    pub fn columns(&self) -> Vec<&str> {
        match &self.value {
            Value::Map(fields) => fields.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Raw value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.value.as_map().and_then(|fields| fields.get(column))
    }

    /// Decode a column into `T`.
    pub fn decode<T: FromValue>(&self, column: &str) -> SurrealResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| SurrealError::ColumnNotFound(column.to_string()))?;
        T::from_value(value)
    }

    /// The whole row value, e.g. for `RETURN` queries yielding scalars.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// A scan destination.
///
/// Decoding and writing are separate steps so a scan can decode every
/// slot before touching any of them.
pub trait Dest {
    /// Decode `value` into a staged, not yet visible, result.
    fn stage(&self, value: &Value) -> SurrealResult<Box<dyn Any>>;

    /// Write a result produced by [`Dest::stage`] on this destination.
    fn commit(&mut self, staged: Box<dyn Any>);
}

impl<T: FromValue + 'static> Dest for T {
    fn stage(&self, value: &Value) -> SurrealResult<Box<dyn Any>> {
        T::from_value(value).map(|decoded| Box::new(decoded) as Box<dyn Any>)
    }

    fn commit(&mut self, staged: Box<dyn Any>) {
        if let Ok(decoded) = staged.downcast::<T>() {
            *self = *decoded;
        }
    }
}

/// Cursor over the rows of one successful query.
#[derive(Debug, Clone, Default)]
pub struct Rows {
    rows: Vec<Row>,
    /// Index of the current row plus one; 0 before the first `next()`
    position: usize,
}

impl Rows {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            rows: values.into_iter().map(Row::new).collect(),
            position: 0,
        }
    }

    /// Advance to the next row. Returns `false` once rows are exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.position < self.rows.len() {
            self.position += 1;
            true
        } else {
            self.position = self.rows.len() + 1;
            false
        }
    }

    /// The current row, if `next()` returned `true`.
    pub fn row(&self) -> Option<&Row> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
    }

    /// Canonical column names of the current row, or of the first row
    /// before iteration starts.
    pub fn columns(&self) -> Vec<&str> {
        let row = if self.position == 0 {
            self.rows.first()
        } else {
            self.row()
        };
        row.map(Row::columns).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.rows.into_iter().map(Row::into_value).collect()
    }

    /// Scan the current row into `dest`, slot *i* receiving canonical
    /// column *i*.
    pub fn scan(&self, dest: &mut [&mut dyn Dest]) -> SurrealResult<()> {
        let row = self.row().ok_or(SurrealError::NoRow)?;
        let columns = row.columns();

        if cfg!(debug_assertions) && dest.len() != columns.len() {
            tracing::warn!(
                slots = dest.len(),
                columns = columns.len(),
                "scan slot count differs from column count; slots follow alphabetical column order"
            );
        }

        let mut staged = Vec::with_capacity(dest.len());
        for (index, slot) in dest.iter().enumerate() {
            let column = columns
                .get(index)
                .ok_or_else(|| SurrealError::ColumnNotFound(format!("#{}", index)))?;
            staged.push(stage_column(row, column, &**slot)?);
        }

        commit(dest, staged);
        Ok(())
    }

    /// Scan the current row by column name, `names[i]` filling `dest[i]`.
    ///
    /// `names` and `dest` must have the same length.
    pub fn scan_named(&self, names: &[&str], dest: &mut [&mut dyn Dest]) -> SurrealResult<()> {
        let row = self.row().ok_or(SurrealError::NoRow)?;

        if cfg!(debug_assertions) && !names.is_sorted() {
            tracing::debug!(
                ?names,
                "columns requested out of canonical order; the store returns them alphabetically"
            );
        }

        if names.len() != dest.len() {
            let unmatched = match names.get(dest.len()) {
                Some(name) => name.to_string(),
                None => format!("#{}", names.len()),
            };
            return Err(SurrealError::ColumnNotFound(unmatched));
        }

        let mut staged = Vec::with_capacity(dest.len());
        for (column, slot) in names.iter().zip(dest.iter()) {
            staged.push(stage_column(row, column, &**slot)?);
        }

        commit(dest, staged);
        Ok(())
    }
}

fn stage_column(row: &Row, column: &str, slot: &dyn Dest) -> SurrealResult<Box<dyn Any>> {
    let value = row
        .get(column)
        .ok_or_else(|| SurrealError::ColumnNotFound(column.to_string()))?;
    slot.stage(value)
}

fn commit(dest: &mut [&mut dyn Dest], staged: Vec<Box<dyn Any>>) {
    for (slot, decoded) in dest.iter_mut().zip(staged) {
        slot.commit(decoded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Many, RecordUuid};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Post {
        title: String,
    }

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Posted {
        id: String,
    }

    fn rows(json: serde_json::Value) -> Rows {
        match Value::from(json) {
            Value::Array(values) => Rows::new(values),
            other => Rows::new(vec![other]),
        }
    }

    #[test]
    fn test_scan_named_collections() {
        let mut rows = rows(json!([{"name": "mark", "posts": [{"title": "a"}], "posted": []}]));
        assert!(rows.next());

        let mut name = String::new();
        let mut posts: Many<Post> = Many::default();
        let mut posted: Many<Posted> = Many::default();
        rows.scan_named(
            &["name", "posts", "posted"],
            &mut [&mut name, &mut posts, &mut posted],
        )
        .unwrap();

        assert_eq!(name, "mark");
        assert_eq!(posts.0, vec![Post { title: "a".into() }]);
        assert!(posted.is_empty());
        assert!(!rows.next());
    }

    #[test]
    fn test_columns_are_canonical() {
        let mut rows = rows(json!([{"name": "mark", "id": "user:mark", "age": 9999}]));
        assert_eq!(rows.columns(), vec!["age", "id", "name"]);
        assert!(rows.next());
        assert_eq!(rows.columns(), vec!["age", "id", "name"]);
    }

    #[test]
    fn test_positional_scan_follows_canonical_order() {
        let mut rows = rows(json!([{"name": "mark", "id": "user:mark", "age": 9999}]));
        rows.next();

        let mut age = 0i64;
        let mut id = String::new();
        let mut name = String::new();
        rows.scan(&mut [&mut age, &mut id, &mut name]).unwrap();

        assert_eq!((age, id.as_str(), name.as_str()), (9999, "user:mark", "mark"));
    }

    #[test]
    fn test_failed_scan_leaves_destinations_untouched() {
        let mut rows = rows(json!([{"age": "old", "id": "user:mark", "name": "mark"}]));
        rows.next();

        let mut id = String::from("before");
        let mut name = String::from("before");
        let mut age = -1i64;
        let err = rows
            .scan_named(&["id", "name", "age"], &mut [&mut id, &mut name, &mut age])
            .unwrap_err();

        assert!(matches!(err, SurrealError::Decode { .. }));
        assert_eq!(id, "before");
        assert_eq!(name, "before");
        assert_eq!(age, -1);
    }

    #[test]
    fn test_column_not_found() {
        let mut rows = rows(json!([{"id": "user:mark"}]));
        rows.next();

        let mut id = String::new();
        let mut name = String::new();
        let err = rows
            .scan_named(&["id", "name"], &mut [&mut id, &mut name])
            .unwrap_err();
        assert!(matches!(err, SurrealError::ColumnNotFound(ref c) if c == "name"));
        assert!(id.is_empty());

        let err = rows.scan(&mut [&mut id, &mut name]).unwrap_err();
        assert!(matches!(err, SurrealError::ColumnNotFound(_)));
    }

    #[test]
    fn test_scan_named_count_mismatch() {
        let mut rows = rows(json!([{"id": "user:mark", "name": "mark"}]));
        rows.next();

        let mut id = String::new();
        let err = rows.scan_named(&["id", "name"], &mut [&mut id]).unwrap_err();
        assert!(matches!(err, SurrealError::ColumnNotFound(ref c) if c == "name"));
        assert!(id.is_empty());

        let mut name = String::new();
        let err = rows
            .scan_named(&["id"], &mut [&mut id, &mut name])
            .unwrap_err();
        assert!(matches!(err, SurrealError::ColumnNotFound(ref c) if c == "#1"));
        assert!(id.is_empty());
        assert!(name.is_empty());
    }

    #[test]
    fn test_scan_requires_current_row() {
        let mut rows = rows(json!([{"id": "user:mark"}]));
        let mut id = String::new();
        assert!(matches!(rows.scan(&mut [&mut id]), Err(SurrealError::NoRow)));
        rows.next();
        rows.next();
        assert!(matches!(rows.scan(&mut [&mut id]), Err(SurrealError::NoRow)));
    }

    #[test]
    fn test_row_decode_and_scalar_rows() {
        let mut rows = rows(json!([
            {"id": "user:`3f2504e0-4f89-11d3-9a0c-0305e82c3301`"},
            42
        ]));
        rows.next();
        let uid: RecordUuid = rows.row().unwrap().decode("id").unwrap();
        assert_eq!(uid.uuid().to_string(), "3f2504e0-4f89-11d3-9a0c-0305e82c3301");

        rows.next();
        let row = rows.row().unwrap();
        assert!(row.columns().is_empty());
        assert_eq!(row.value(), &Value::Int(42));
    }

    #[test]
    fn test_empty_rows() {
        let mut rows = Rows::new(Vec::new());
        assert!(rows.is_empty());
        assert!(rows.columns().is_empty());
        assert!(!rows.next());
    }
}
