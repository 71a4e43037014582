//! `FIELD=VALUE` filter for ticket listings.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use ticketwatch_core::errors::TrackerError;
use ticketwatch_core::Record;

/// Keeps tickets whose `field` equals `value`.
///
/// String fields match verbatim. Numbers and booleans match their JSON
/// text, so `priority=2` and `urgent=true` work. Null, sequences and
/// records never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFilter {
    pub field: String,
    pub value: String,
}

impl TicketFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match record.get(&self.field) {
            Some(Value::String(s)) => *s == self.value,
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string() == self.value,
            _ => false,
        }
    }
}

impl FromStr for TicketFilter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                Ok(Self::new(field.trim(), value))
            }
            _ => Err(TrackerError::InvalidFilter {
                filter: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TicketFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}
