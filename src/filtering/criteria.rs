//! Validated criteria bundle for one query.

use std::sync::LazyLock;

use regex::Regex;
use xxhash_rust::xxh3::xxh3_64;

use super::conditions::is_sql_identifier;
use super::spec::{FieldPath, FilterSpec, SortDirection, SortSpec};
use crate::validation::{ValidationError, ValidationErrors};

/// `<field>,<ASC|DESC>`; the field accepts letters, digits, `_` and `-` only, and must
/// additionally be a plain column name to be sortable.
static ORDER_BY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A[A-Za-z0-9_-]+,+(ASC|DESC|asc|desc)\z").expect("order-by pattern is valid")
});

/// Immutable `{params, orderBy, language}` bundle.
///
/// Construction fails fast: the order-by clause must match the `field,DIRECTION`
/// grammar and its field must appear among the filter keys, which keeps sorting
/// restricted to columns the caller already filters on.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaDto {
    params: FilterSpec,
    order_by: Option<SortSpec>,
    language: Option<String>,
}

impl CriteriaDto {
    /// # Errors
    ///
    /// Returns every failed assertion: empty `language`, malformed `order_by`, an
    /// order-by field that is not a column name, or one absent from `params`.
    pub fn create(
        params: FilterSpec,
        order_by: Option<&str>,
        language: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if language.is_some_and(str::is_empty) {
            errors.add(ValidationError::new(
                "language",
                "Language must not be empty if present",
                "language.notEmpty",
            ));
        }

        let mut parsed_order = None;
        if let Some(clause) = order_by {
            if ORDER_BY_PATTERN.is_match(clause) {
                let sort = parse_order_clause(clause)?;
                if is_sql_identifier(sort.field.as_str()) {
                    parsed_order = Some(sort);
                } else {
                    errors.add(ValidationError::new(
                        "orderBy",
                        "OrderBy field must be a column name",
                        "criteriaOrderBy.invalidField",
                    ));
                }
            } else {
                errors.add(ValidationError::new(
                    "orderBy",
                    "OrderBy clause accepts alphabetical, numeric and - _ characters",
                    "criteriaOrderBy.invalidValue",
                ));
            }
        }
        errors.into_result()?;

        if let Some(sort) = &parsed_order {
            let field = sort.field.as_str();
            if !params.key_segments().any(|segment| segment == field) {
                return Err(ValidationError::new(
                    "orderBy",
                    "Sort field must be a valid value",
                    "criteriaSortValue.notAllowed",
                )
                .into());
            }
        }

        Ok(Self {
            params,
            order_by: parsed_order,
            language: language.map(str::to_string),
        })
    }

    #[must_use]
    pub fn params(&self) -> &FilterSpec {
        &self.params
    }

    #[must_use]
    pub fn order_by(&self) -> Option<&SortSpec> {
        self.order_by.as_ref()
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Stable digest of the whole bundle, suitable as a cache key
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut canonical: String = self
            .params
            .iter()
            .map(|filter| format!("{}={:?}&", filter.path, filter.value))
            .collect();
        if let Some(sort) = &self.order_by {
            canonical.push_str(&format!("|{},{}", sort.field, sort.direction.as_sql()));
        }
        if let Some(language) = &self.language {
            canonical.push('|');
            canonical.push_str(language);
        }
        format!("{:016x}", xxh3_64(canonical.as_bytes()))
    }
}

/// Split an already pattern-checked clause into field and direction
fn parse_order_clause(clause: &str) -> Result<SortSpec, ValidationError> {
    let field = clause.split(',').next().unwrap_or_default();
    let direction = clause.rsplit(',').next().unwrap_or_default();
    Ok(SortSpec {
        field: FieldPath::parse(field)?,
        direction: direction.parse::<SortDirection>()?,
    })
}
