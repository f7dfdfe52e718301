//! Filter predicates and sort keys evaluated against JSON values.
//!
//! Text is compared after transliteration to ASCII and lowercasing, the in-memory
//! counterpart of `lower(unaccent(x))` in SQL. Numbers compare numerically, and a
//! number matches text that parses to the same value.

use std::cmp::Ordering;

use deunicode::deunicode;
use serde_json::Value;

use super::path::{resolve, resolve_first};
use crate::filtering::{FieldFilter, FieldPath, FilterValue, Scalar};

/// Case and accent insensitive form of `text`
#[must_use]
pub fn normalize_text(text: &str) -> String {
    deunicode(text).to_lowercase()
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn scalar_matches(value: &Value, scalar: &Scalar) -> bool {
    match (value, scalar) {
        (Value::Array(items), _) => items.iter().any(|item| scalar_matches(item, scalar)),
        (Value::Null, Scalar::Null) => true,
        (Value::Bool(a), Scalar::Bool(b)) => a == b,
        (Value::String(s), Scalar::Bool(b)) => s.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        (Value::Bool(b), Scalar::Text(t)) => t.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        (Value::String(a), Scalar::Text(b)) => a == b || normalize_text(a) == normalize_text(b),
        (Value::Number(_) | Value::String(_), Scalar::Number(_) | Scalar::Text(_)) => {
            matches!((numeric(value), scalar.as_f64()), (Some(a), Some(b)) if a == b)
        }
        _ => false,
    }
}

fn numeric_matches(value: &Value, test: &dyn Fn(f64) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|item| numeric_matches(item, test)),
        other => numeric(other).is_some_and(test),
    }
}

/// Whether a single value satisfies the filter
#[must_use]
pub fn value_matches(value: &Value, filter: &FilterValue) -> bool {
    match filter {
        FilterValue::Eq(scalar) => scalar_matches(value, scalar),
        FilterValue::AtLeast(min) => numeric_matches(value, &|n: f64| n >= *min),
        FilterValue::AtMost(max) => numeric_matches(value, &|n: f64| n <= *max),
        FilterValue::Range(lo, hi) => numeric_matches(value, &|n: f64| *lo <= n && n <= *hi),
        FilterValue::Set(scalars) => scalars.iter().any(|scalar| scalar_matches(value, scalar)),
    }
}

/// A record matches when any value its path reaches satisfies the filter.
/// Records where the path does not exist never match.
#[must_use]
pub fn record_matches(record: &Value, filter: &FieldFilter) -> bool {
    resolve(record, &filter.path)
        .into_iter()
        .any(|value| value_matches(value, &filter.value))
}

/// Orderable view of a field value
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SortKey {
    /// `None` for null, objects, and missing paths
    #[must_use]
    pub fn of(record: &Value, path: &FieldPath) -> Option<Self> {
        match resolve_first(record, path)? {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(normalize_text(s))),
            Value::Array(items) => items.first().and_then(|first| match first {
                Value::Number(n) => n.as_f64().map(Self::Number),
                Value::String(s) => Some(Self::Text(normalize_text(s))),
                Value::Bool(b) => Some(Self::Bool(*b)),
                _ => None,
            }),
            Value::Null | Value::Object(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    /// Total order: booleans, then numbers, then text
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}
