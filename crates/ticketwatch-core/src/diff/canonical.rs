//! Order-independent canonical forms of JSON values.
//!
//! [`canonicalize`] maps a value onto [`Canonical`], which is totally
//! ordered, so sequences can be compared as multisets by sorting their
//! canonical elements. Records become key-sorted pairs; sequences keep
//! their element order. Inputs are never mutated.

use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use thiserror::Error;

/// Totally ordered, comparable mirror of a JSON value.
///
/// Variants order as Null < Bool < Number < String < Sequence < Record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Canonical {
    Null,
    Bool(bool),
    Number(CanonicalNumber),
    String(String),
    Sequence(Vec<Canonical>),
    Record(Vec<(String, Canonical)>),
}

/// A JSON number normalized so that `1` and `1.0` are the same value.
#[derive(Debug, Clone, Copy)]
pub enum CanonicalNumber {
    Integer(i128),
    Float(f64),
}

/// Integral floats below this magnitude convert to `i128` exactly.
const I128_FLOAT_LIMIT: f64 = 1.7e38;

impl CanonicalNumber {
    /// Normalize a JSON number.
    ///
    /// # Errors
    ///
    /// `UnsupportedNumber` if the number has no finite `f64` reading.
    pub fn from_json(n: &Number) -> Result<Self, CanonicalizeError> {
        if let Some(i) = n.as_i64() {
            return Ok(Self::Integer(i128::from(i)));
        }
        if let Some(u) = n.as_u64() {
            return Ok(Self::Integer(i128::from(u)));
        }
        match n.as_f64() {
            Some(f) if f.is_finite() => {
                if f.fract() == 0.0 && f.abs() < I128_FLOAT_LIMIT {
                    Ok(Self::Integer(f as i128))
                } else {
                    Ok(Self::Float(f))
                }
            }
            _ => Err(CanonicalizeError::UnsupportedNumber(n.to_string())),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl Ord for CanonicalNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            // Mixed: integral values never appear as Float, so a numeric tie
            // only comes from f64 rounding and is broken by variant.
            (Self::Integer(_), Self::Float(_)) => {
                self.as_f64().total_cmp(&other.as_f64()).then(Ordering::Less)
            }
            (Self::Float(_), Self::Integer(_)) => self
                .as_f64()
                .total_cmp(&other.as_f64())
                .then(Ordering::Greater),
        }
    }
}

impl PartialOrd for CanonicalNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CanonicalNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CanonicalNumber {}

/// Why a value has no canonical form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizeError {
    #[error("number {0} cannot be canonicalized")]
    UnsupportedNumber(String),
}

/// Build the canonical form of a value, recursing through any nesting.
///
/// # Errors
///
/// Fails if any nested number cannot be normalized.
pub fn canonicalize(value: &Value) -> Result<Canonical, CanonicalizeError> {
    Ok(match value {
        Value::Null => Canonical::Null,
        Value::Bool(b) => Canonical::Bool(*b),
        Value::Number(n) => Canonical::Number(CanonicalNumber::from_json(n)?),
        Value::String(s) => Canonical::String(s.clone()),
        Value::Array(items) => Canonical::Sequence(
            items
                .iter()
                .map(canonicalize)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(map) => {
            let mut pairs = map
                .iter()
                .map(|(k, v)| canonicalize(v).map(|c| (k.clone(), c)))
                .collect::<Result<Vec<_>, _>>()?;
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Canonical::Record(pairs)
        }
    })
}

/// Canonicalize every element of a sequence and sort the results.
///
/// # Errors
///
/// Fails if any element cannot be canonicalized.
pub fn sorted_canonical(items: &[Value]) -> Result<Vec<Canonical>, CanonicalizeError> {
    let mut canonical = items
        .iter()
        .map(canonicalize)
        .collect::<Result<Vec<_>, _>>()?;
    canonical.sort();
    Ok(canonical)
}

/// Compact JSON with object keys sorted at every level.
///
/// Independent of the map ordering serde_json was built with.
pub fn canonical_json(value: &Value) -> String {
    sorted_keys(value).to_string()
}

/// Copy of a value whose objects are rebuilt in key order.
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, item)| (key.clone(), sorted_keys(item)))
                .collect();
            Value::Object(sorted)
        }
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_and_integral_float_are_equal() {
        assert_eq!(
            canonicalize(&json!(1)).unwrap(),
            canonicalize(&json!(1.0)).unwrap()
        );
        assert_ne!(
            canonicalize(&json!(1)).unwrap(),
            canonicalize(&json!(1.5)).unwrap()
        );
    }

    #[test]
    fn test_numbers_order_numerically() {
        let mut values = vec![
            canonicalize(&json!(2.5)).unwrap(),
            canonicalize(&json!(-3)).unwrap(),
            canonicalize(&json!(2)).unwrap(),
            canonicalize(&json!(u64::MAX)).unwrap(),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                canonicalize(&json!(-3)).unwrap(),
                canonicalize(&json!(2)).unwrap(),
                canonicalize(&json!(2.5)).unwrap(),
                canonicalize(&json!(u64::MAX)).unwrap(),
            ]
        );
    }

    #[test]
    fn test_record_key_order_is_irrelevant() {
        let a = canonicalize(&json!({"b": 1, "a": [1, 2]})).unwrap();
        let b = canonicalize(&json!({"a": [1, 2], "b": 1})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nested_sequences_keep_order() {
        let a = canonicalize(&json!([[1, 2]])).unwrap();
        let b = canonicalize(&json!([[2, 1]])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_mixed_variants_sort_by_rank() {
        let sorted = sorted_canonical(&[json!("x"), json!(null), json!(3), json!(true)]).unwrap();
        assert_eq!(
            sorted,
            vec![
                Canonical::Null,
                Canonical::Bool(true),
                Canonical::Number(CanonicalNumber::Integer(3)),
                Canonical::String("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_canonical_json_sorts_keys_compactly() {
        let v = json!({"z": {"b": 2, "a": 1}, "a": [3, "x"], "m": null});
        assert_eq!(
            canonical_json(&v),
            r#"{"a":[3,"x"],"m":null,"z":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn test_unsupported_number_message() {
        let err = CanonicalizeError::UnsupportedNumber("NaN".to_string());
        assert_eq!(err.to_string(), "number NaN cannot be canonicalized");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_canonical_json_escapes_keys() {
        let v = json!({"quo\"te": "line\nbreak"});
        assert_eq!(canonical_json(&v), r#"{"quo\"te":"line\nbreak"}"#);
    }
}
