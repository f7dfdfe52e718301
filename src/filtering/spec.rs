//! Filter and sort specifications.

use std::fmt;
use std::str::FromStr;

use sea_orm::sea_query::Order;
use serde_json::Value;

use super::value::FilterValue;
use crate::validation::{ValidationError, ValidationErrors};

pub const PATH_SEPARATOR: char = '.';

/// Dot-separated field address. The first segment is the column (or top-level record
/// key); any further segments descend into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// # Errors
    ///
    /// Fails when the path is empty or has an empty segment (`"a..b"`, `".a"`).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let segments: Vec<String> = raw.split(PATH_SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ValidationError::new(
                raw,
                "Field path segments must not be empty",
                "criteriaField.invalidPath",
            ));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Column (or top-level key) the path starts from
    #[must_use]
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Whether the path descends into a JSON document
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FieldPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One field predicate
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Internal address used for SQL columns and record lookups
    pub path: FieldPath,
    /// Caller-facing parameter name, when it differs from the path
    pub external: Option<String>,
    pub value: FilterValue,
}

impl FieldFilter {
    #[must_use]
    pub fn new(path: FieldPath, value: FilterValue) -> Self {
        Self {
            path,
            external: None,
            value,
        }
    }

    /// Name to report back to the caller
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.external.as_deref().unwrap_or(self.path.as_str())
    }
}

/// Ordered set of field predicates, AND-ed together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    filters: Vec<FieldFilter>,
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// # Errors
    ///
    /// Fails when `path` is not a valid field path.
    pub fn with(mut self, path: &str, value: impl Into<FilterValue>) -> Result<Self, ValidationError> {
        self.filters.push(FieldFilter::new(FieldPath::parse(path)?, value.into()));
        Ok(self)
    }

    pub fn push(&mut self, filter: FieldFilter) {
        self.filters.push(filter);
    }

    /// Parse a JSON object of filters. Each entry is either a raw value
    /// (`{"age": 30}`) or the request-criteria shape
    /// (`{"age": {"external": "edad", "value": 30}}`).
    ///
    /// # Errors
    ///
    /// Collects an error for every malformed path or value.
    pub fn from_json(json: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Value::Object(map) = json else {
            return Err(ValidationError::new(
                "params",
                "Filters must be a JSON object",
                "criteriaFilter.invalidShape",
            )
            .into());
        };

        let mut spec = Self::new();
        for (key, entry) in map {
            let (external, raw_value) = match entry {
                Value::Object(obj) if obj.contains_key("value") => (
                    obj.get("external").and_then(Value::as_str).map(str::to_string),
                    &obj["value"],
                ),
                other => (None, other),
            };

            let path = match FieldPath::parse(key) {
                Ok(path) => path,
                Err(e) => {
                    errors.add(e);
                    continue;
                }
            };
            match FilterValue::from_json(key, raw_value) {
                Ok(value) => spec.push(FieldFilter {
                    path,
                    external,
                    value,
                }),
                Err(e) => errors.add(e),
            }
        }

        errors.into_result().map(|()| spec)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldFilter> {
        self.filters.iter()
    }

    /// Every path segment of every filter key, flattened
    pub fn key_segments(&self) -> impl Iterator<Item = &str> {
        self.filters
            .iter()
            .flat_map(|f| f.path.segments().iter().map(String::as_str))
    }
}

impl<'a> IntoIterator for &'a FilterSpec {
    type Item = &'a FieldFilter;
    type IntoIter = std::slice::Iter<'a, FieldFilter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

impl FromIterator<FieldFilter> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = FieldFilter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    /// Case-insensitive `asc` / `desc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(ValidationError::new(
                "operator",
                "Sort direction must be ASC or DESC",
                "criteriaSortDirection.invalidValue",
            ))
        }
    }
}

impl From<SortDirection> for Order {
    fn from(dir: SortDirection) -> Self {
        match dir {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Single `(field, direction)` ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: FieldPath,
    pub direction: SortDirection,
}

impl SortSpec {
    /// # Errors
    ///
    /// Fails on an invalid field path or a direction other than asc/desc.
    pub fn parse(field: &str, direction: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            field: FieldPath::parse(field)?,
            direction: direction.parse()?,
        })
    }

    #[must_use]
    pub fn asc(field: FieldPath) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: FieldPath) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Parse the `{"sort": "age", "operator": "desc"}` request shape.
    ///
    /// # Errors
    ///
    /// Fails when `sort` is missing or either value is invalid.
    pub fn from_json(json: &Value) -> Result<Self, ValidationError> {
        let field = json.get("sort").and_then(Value::as_str).ok_or_else(|| {
            ValidationError::new("sort", "Sort field is required", "criteriaSort.missing")
        })?;
        let direction = json.get("operator").and_then(Value::as_str).unwrap_or("asc");
        Self::parse(field, direction)
    }
}
