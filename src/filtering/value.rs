//! Filter values, resolved once from raw request JSON.
//!
//! Raw values arrive as loosely typed JSON. They are classified into a [`FilterValue`]
//! when the filter spec is built, so both the SQL translator and the in-memory engine
//! dispatch on a closed set of variants instead of re-inspecting strings per record.

use serde_json::{Number, Value};

use crate::validation::ValidationError;

/// A single comparable literal
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Null,
    Text(String),
}

impl Scalar {
    /// Classify a JSON literal. The string `"null"` is treated as SQL `NULL`.
    ///
    /// Returns `None` for arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::Null => Some(Self::Null),
            Value::String(s) if s == "null" => Some(Self::Null),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Null => None,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Null => "null",
            Self::Text(_) => "text",
        }
    }
}

/// Operator plus operand for one field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Equality (membership for sequence-valued fields in memory)
    Eq(Scalar),
    /// `"≥N"` or `">=N"`
    AtLeast(f64),
    /// `"≤N"` or `"<=N"`
    AtMost(f64),
    /// `"lo-hi"`, inclusive on both ends
    Range(f64, f64),
    /// Any of the listed values
    Set(Vec<Scalar>),
}

const AT_LEAST_PREFIXES: [&str; 2] = ["≥", ">="];
const AT_MOST_PREFIXES: [&str; 2] = ["≤", "<="];

fn strip_number<'a>(text: &'a str, prefixes: &[&str]) -> Option<f64> {
    prefixes
        .iter()
        .find_map(|p| text.strip_prefix(p))
        .and_then(|rest| rest.trim().parse::<f64>().ok())
}

/// `"20-40"` → `(20, 40)`. The low bound must be present, so `"-5"` stays text.
fn parse_range(text: &str) -> Option<(f64, f64)> {
    let (lo, hi) = text.split_once('-')?;
    let lo = lo.trim();
    let hi = hi.trim();
    if lo.is_empty() || hi.is_empty() {
        return None;
    }
    Some((lo.parse().ok()?, hi.parse().ok()?))
}

impl FilterValue {
    /// Classify a raw JSON filter value.
    ///
    /// # Errors
    ///
    /// Objects, and arrays containing anything but literals, are rejected.
    pub fn from_json(field: &str, value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    Scalar::from_json(item).ok_or_else(|| {
                        ValidationError::new(
                            field,
                            "Multiple-value filters accept only literal values",
                            "criteriaFilter.invalidSet",
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Set),
            Value::Object(_) => Err(ValidationError::new(
                field,
                "Filter value must be a literal or a list of literals",
                "criteriaFilter.invalidValue",
            )),
            Value::String(text) => Ok(Self::parse_text(text)),
            other => Scalar::from_json(other).map(Self::Eq).ok_or_else(|| {
                ValidationError::new(field, "Unsupported filter value", "criteriaFilter.invalidValue")
            }),
        }
    }

    fn parse_text(text: &str) -> Self {
        if text == "null" {
            return Self::Eq(Scalar::Null);
        }
        if let Some(n) = strip_number(text, &AT_LEAST_PREFIXES) {
            return Self::AtLeast(n);
        }
        if let Some(n) = strip_number(text, &AT_MOST_PREFIXES) {
            return Self::AtMost(n);
        }
        if let Some((lo, hi)) = parse_range(text) {
            return Self::Range(lo, hi);
        }
        Self::Eq(Scalar::Text(text.to_string()))
    }
}

impl From<Scalar> for FilterValue {
    fn from(scalar: Scalar) -> Self {
        Self::Eq(scalar)
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        Self::parse_text(text)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Eq(Scalar::Bool(b))
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Eq(Scalar::Number(n.into()))
    }
}
