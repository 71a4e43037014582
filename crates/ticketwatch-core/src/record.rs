//! Schema-less ticket records and entity id resolution.

use crate::errors::{Result, TrackerError};
use serde_json::Value;

/// One ticket's field map as delivered by the webhook.
pub type Record = serde_json::Map<String, Value>;

/// Borrow a payload as a record.
///
/// # Errors
///
/// `PayloadNotObject` if the JSON root is anything but an object.
pub fn as_record(payload: &Value) -> Result<&Record> {
    payload
        .as_object()
        .ok_or_else(|| TrackerError::PayloadNotObject {
            found: value_kind(payload).to_string(),
        })
}

/// Take ownership of a payload as a record.
///
/// # Errors
///
/// `PayloadNotObject` if the JSON root is anything but an object.
pub fn into_record(payload: Value) -> Result<Record> {
    match payload {
        Value::Object(map) => Ok(map),
        other => Err(TrackerError::PayloadNotObject {
            found: value_kind(&other).to_string(),
        }),
    }
}

/// Resolve the ticket id from the first candidate field holding a usable value.
///
/// Strings must be non-empty; non-zero numbers are rendered in decimal.
/// Null, zero, booleans, sequences and nested records are skipped and the
/// next candidate is tried.
///
/// # Errors
///
/// `MissingTicketId` if no candidate resolves.
pub fn resolve_ticket_id<S: AsRef<str>>(record: &Record, candidates: &[S]) -> Result<String> {
    candidates
        .iter()
        .find_map(|key| record.get(key.as_ref()).and_then(id_from_value))
        .ok_or_else(|| TrackerError::MissingTicketId {
            candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Null or the empty string.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Short name of a value's variant, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}
