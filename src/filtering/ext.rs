//! Apply criteria to statements built elsewhere.
//!
//! [`QueryBuilder`](crate::core::QueryBuilder) is the full session type, but services
//! that already hold a `sea_query::SelectStatement` or a `sea_orm::Select<E>` can attach
//! the same WHERE / ORDER BY translation through [`CriteriaExt`].

use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Select, sea_query::SelectStatement};

use super::conditions::filter_condition;
use super::criteria::CriteriaDto;
use super::sort::sort_expr;
use super::spec::{FilterSpec, SortSpec};
use crate::config::CriteriaConfig;
use crate::validation::ValidationErrors;

/// Every method validates `config` first, since its identifiers are spliced into SQL.
pub trait CriteriaExt: Sized {
    /// # Errors
    ///
    /// Returns the validation errors of `config`.
    fn apply_filters(self, spec: &FilterSpec, config: &CriteriaConfig) -> Result<Self, ValidationErrors>;

    /// # Errors
    ///
    /// Returns the validation errors of `config`.
    fn apply_sorting(self, sort: &SortSpec, config: &CriteriaConfig) -> Result<Self, ValidationErrors>;

    /// # Errors
    ///
    /// Returns the validation errors of `config`.
    fn apply_criteria(self, criteria: &CriteriaDto, config: &CriteriaConfig) -> Result<Self, ValidationErrors> {
        let filtered = self.apply_filters(criteria.params(), config)?;
        match criteria.order_by() {
            Some(sort) => filtered.apply_sorting(sort, config),
            None => Ok(filtered),
        }
    }
}

impl CriteriaExt for SelectStatement {
    fn apply_filters(mut self, spec: &FilterSpec, config: &CriteriaConfig) -> Result<Self, ValidationErrors> {
        config.validate()?;
        let condition = filter_condition(spec, &config.unaccent_function);
        if !condition.is_empty() {
            self.cond_where(condition);
        }
        Ok(self)
    }

    fn apply_sorting(mut self, sort: &SortSpec, config: &CriteriaConfig) -> Result<Self, ValidationErrors> {
        config.validate()?;
        if let Some((expr, order)) = sort_expr(sort, &config.unaccent_function) {
            self.order_by_expr(expr, order);
        }
        Ok(self)
    }
}

impl<E: EntityTrait> CriteriaExt for Select<E> {
    fn apply_filters(self, spec: &FilterSpec, config: &CriteriaConfig) -> Result<Self, ValidationErrors> {
        config.validate()?;
        let condition = filter_condition(spec, &config.unaccent_function);
        if condition.is_empty() {
            Ok(self)
        } else {
            Ok(self.filter(condition))
        }
    }

    fn apply_sorting(self, sort: &SortSpec, config: &CriteriaConfig) -> Result<Self, ValidationErrors> {
        config.validate()?;
        Ok(match sort_expr(sort, &config.unaccent_function) {
            Some((expr, order)) => self.order_by(expr, order),
            None => self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Alias, Asterisk, PostgresQueryBuilder, Query};

    #[test]
    fn test_statement_extension_applies_where_and_order() {
        let params = FilterSpec::new().with("name", "Ana").unwrap();
        let criteria = CriteriaDto::create(params, Some("name,DESC"), None).unwrap();

        let statement = Query::select()
            .column(Asterisk)
            .from(Alias::new("users"))
            .to_owned()
            .apply_criteria(&criteria, &CriteriaConfig::default())
            .unwrap();
        let (sql, values) = statement.build(PostgresQueryBuilder);

        assert!(sql.contains(r#"WHERE lower(immutable_unaccent("name"::TEXT))"#), "{sql}");
        assert!(sql.ends_with(r#"ORDER BY lower(immutable_unaccent("name"::TEXT)) DESC"#), "{sql}");
        assert_eq!(values.0.len(), 1);
    }

    #[test]
    fn test_empty_spec_adds_no_where() {
        let statement = Query::select()
            .column(Asterisk)
            .from(Alias::new("users"))
            .to_owned()
            .apply_filters(&FilterSpec::new(), &CriteriaConfig::default())
            .unwrap();
        let sql = statement.to_string(PostgresQueryBuilder);
        assert_eq!(sql, r#"SELECT * FROM "users""#);
    }

    #[test]
    fn test_unvalidated_config_is_refused() {
        let config = CriteriaConfig {
            unaccent_function: "unaccent(".to_string(),
            ..CriteriaConfig::default()
        };
        let sort = SortSpec::parse("name", "asc").unwrap();
        let result = Query::select()
            .column(Asterisk)
            .from(Alias::new("users"))
            .to_owned()
            .apply_sorting(&sort, &config);
        assert!(result.unwrap_err().has_code("criteriaConfig.unaccentFunction"));
    }
}
