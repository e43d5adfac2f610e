//! Response envelope classification.
//!
//! The store answers every `query` call with
//! `[{"status": "OK", "time": "...", "result": [...]}]` or
//! `[{"status": "ERR", "detail": "..."}]`.

use crate::error::{SurrealError, SurrealResult};
use crate::value::Value;

/// Envelope status values understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Err,
}

impl Status {
    /// Parse a status string.
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "OK" => Some(Status::Ok),
            "ERR" => Some(Status::Err),
            _ => None,
        }
    }
}

/// Classify a decoded response into its result rows.
///
/// Only a single-element top-level array wrapping one status block is
/// accepted; multiple statements per call are not individually addressable.
pub fn classify(response: Value) -> SurrealResult<Vec<Value>> {
    let mut envelope = match response {
        Value::Array(items) if items.len() == 1 => items,
        Value::Array(items) => {
            return Err(SurrealError::malformed(format!(
                "expected exactly one status block, got {}",
                items.len()
            )));
        }
        other => {
            return Err(SurrealError::malformed(format!(
                "expected array envelope, got {}",
                other.kind()
            )));
        }
    };

    let mut block = match envelope.pop() {
        Some(Value::Map(block)) => block,
        Some(other) => {
            return Err(SurrealError::malformed(format!(
                "expected map status block, got {}",
                other.kind()
            )));
        }
        None => return Err(SurrealError::malformed("empty envelope")),
    };

    if let Some(time) = block.get("time").and_then(Value::as_str) {
        tracing::trace!(time, "store reported execution time");
    }

    let status = block.remove("status").unwrap_or(Value::Null);
    match status.as_str().and_then(Status::parse) {
        Some(Status::Err) => {
            let detail = match block.remove("detail") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(detail)) => detail,
                Some(other) => other.to_json().to_string(),
            };
            Err(SurrealError::Query { detail })
        }
        Some(Status::Ok) => match block.remove("result") {
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(SurrealError::malformed(format!(
                "expected array result, got {}",
                other.kind()
            ))),
            None => Err(SurrealError::malformed("missing result")),
        },
        None => Err(SurrealError::UnknownStatus {
            status: status.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_json(v: serde_json::Value) -> SurrealResult<Vec<Value>> {
        classify(Value::from(v))
    }

    #[test]
    fn test_ok_empty_result() {
        let rows = classify_json(json!([{"status": "OK", "result": []}])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_ok_rows_in_order() {
        let rows = classify_json(json!([{
            "status": "OK",
            "time": "1.2ms",
            "result": [{"id": "post:1"}, {"id": "post:2"}]
        }]))
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].as_map().unwrap()["id"], Value::from("post:2"));
    }

    #[test]
    fn test_err_carries_detail() {
        let err = classify_json(json!([{"status": "ERR", "detail": "parse error near X"}]))
            .unwrap_err();
        match err {
            SurrealError::Query { detail } => assert_eq!(detail, "parse error near X"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_err_without_detail() {
        let err = classify_json(json!([{"status": "ERR"}])).unwrap_err();
        assert!(matches!(err, SurrealError::Query { ref detail } if detail.is_empty()));
    }

    #[test]
    fn test_unknown_status() {
        let err = classify_json(json!([{"status": "PENDING"}])).unwrap_err();
        assert!(matches!(err, SurrealError::UnknownStatus { ref status } if status == "PENDING"));

        let err = classify_json(json!([{"result": []}])).unwrap_err();
        assert!(matches!(err, SurrealError::UnknownStatus { .. }));
    }

    #[test]
    fn test_malformed_shapes() {
        for response in [
            json!({"status": "OK", "result": []}),
            json!([]),
            json!([{"status": "OK", "result": []}, {"status": "OK", "result": []}]),
            json!(["OK"]),
            json!([{"status": "OK", "result": {"id": "x"}}]),
            json!([{"status": "OK"}]),
        ] {
            let err = classify_json(response.clone()).unwrap_err();
            assert!(
                matches!(err, SurrealError::MalformedResponse(_)),
                "{response} gave {err:?}"
            );
        }
    }
}
