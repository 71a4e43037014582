//! Change detection engine.
//!
//! The entry point is [`ChangeDetector::compare`], which takes the stored
//! snapshot (if any) and the new payload and produces a [`Comparison`].

use crate::diff::canonical::{canonical_json, sorted_canonical, CanonicalNumber};
use crate::diff::model::{ChangeEntry, Comparison};
use crate::record::{is_blank, Record};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet};
use ticketwatch_core_types::schema::RECORD_RECEIVED_AT;

/// Field-level change detector.
///
/// Holds the set of bookkeeping fields that must never appear in a diff.
/// The default ignores `received_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDetector {
    ignored_fields: BTreeSet<String>,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::with_ignored_fields([RECORD_RECEIVED_AT])
    }
}

impl ChangeDetector {
    /// A detector ignoring exactly the given fields.
    pub fn with_ignored_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one more ignored field.
    pub fn ignoring(mut self, field: impl Into<String>) -> Self {
        self.ignored_fields.insert(field.into());
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored_fields.contains(field)
    }

    pub fn ignored_fields(&self) -> impl Iterator<Item = &str> {
        self.ignored_fields.iter().map(String::as_str)
    }

    /// Compare the previous snapshot of a ticket with its new payload.
    ///
    /// - No previous snapshot: `changed = true` with the first-observation
    ///   change set.
    /// - Otherwise every non-ignored field of `new` is checked against the
    ///   same field of `old` (absent reads as null). Two blanks (null or
    ///   `""`) never differ; everything else goes through [`values_equal`].
    ///   Fields present only in `old` are not reported.
    pub fn compare(&self, old: Option<&Record>, new: &Record) -> Comparison {
        let Some(old) = old else {
            return Comparison::first_observation();
        };

        let mut fields = BTreeMap::new();
        for (key, new_value) in new {
            if self.is_ignored(key) {
                continue;
            }

            let old_value = old.get(key).unwrap_or(&Value::Null);

            if is_blank(old_value) && is_blank(new_value) {
                continue;
            }

            if !values_equal(old_value, new_value) {
                fields.insert(
                    key.clone(),
                    ChangeEntry {
                        old: old_value.clone(),
                        new: new_value.clone(),
                    },
                );
            }
        }

        Comparison::from_fields(fields)
    }
}

/// Compare with the default detector.
pub fn compare(old: Option<&Record>, new: &Record) -> Comparison {
    ChangeDetector::default().compare(old, new)
}

/// Deep, order-insensitive equality of two field values.
///
/// - identical values are equal;
/// - exactly one null side is never equal;
/// - sequences are equal iff they hold the same multiset of elements;
/// - records are equal iff their key-sorted compact JSON is identical;
/// - numbers compare by numeric value;
/// - anything else is unequal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    if std::ptr::eq(a, b) || a == b {
        return true;
    }

    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Array(xs), Value::Array(ys)) => unordered_sequences_equal(xs, ys),
        (Value::Object(_), Value::Object(_)) => canonical_json(a) == canonical_json(b),
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => false,
    }
}

/// Multiset equality of two sequences.
///
/// Falls back to positional equality when an element has no canonical form.
/// Without serde_json's `arbitrary_precision` every parsed number has a
/// finite `f64` reading, so the fallback is unreachable in practice and no
/// test exercises it.
fn unordered_sequences_equal(xs: &[Value], ys: &[Value]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }

    match (sorted_canonical(xs), sorted_canonical(ys)) {
        (Ok(sorted_x), Ok(sorted_y)) => sorted_x == sorted_y,
        (Err(err), _) | (_, Err(err)) => {
            tracing::debug!(
                component = module_path!(),
                reason = %err,
                "sequence not canonicalizable, comparing positionally"
            );
            xs == ys
        }
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (CanonicalNumber::from_json(x), CanonicalNumber::from_json(y)) {
        (Ok(cx), Ok(cy)) => cx == cy,
        _ => x == y,
    }
}
