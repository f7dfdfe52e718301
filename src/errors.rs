//! # Error Handling for Criteria Processing
//!
//! Three failure families can surface while applying criteria:
//!
//! - [`CriteriaError::Validation`]: malformed criteria inputs, raised when the value
//!   object is constructed.
//! - [`CriteriaError::Paging`]: non-positive `page` / `per_page`, raised before any
//!   filtering, slicing or query work.
//! - [`CriteriaError::Operational`]: a query shape keyset pagination cannot handle
//!   (more than one source table, or no source at all).
//!
//! Database failures from the row-count collaborator are wrapped as
//! [`CriteriaError::Database`].
//!
//! ## Logging
//!
//! Operational errors are logged with `tracing::error!` where they are raised. Install
//! a subscriber in your application to see them:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt().with_target(false).compact().init();
//! ```

use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Convenience alias used across the crate
pub type CriteriaResult<T> = Result<T, CriteriaError>;

/// Top-level error for filter, sort and pagination processing
#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("invalid criteria: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Paging(#[from] PagingError),

    #[error(transparent)]
    Operational(#[from] OperationalError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl CriteriaError {
    /// Whether this error was caused by caller input rather than the query or database
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Paging(_))
    }
}

/// Invalid paging parameters; always raised before any data is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PagingError {
    #[error("page must be greater than or equal to 1, got {0}")]
    InvalidPage(i64),

    #[error("per_page must be greater than or equal to 1, got {0}")]
    InvalidPerPage(i64),
}

/// Query shapes the keyset paginator refuses to work with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationalError {
    #[error("keyset pagination needs exactly one source table, found {}: {}", .0.len(), .0.join(", "))]
    MultipleSourceTables(Vec<String>),

    #[error("keyset pagination needs a FROM table; call from() first")]
    MissingSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_paging_errors_are_client_errors() {
        let err: CriteriaError = PagingError::InvalidPerPage(0).into();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "per_page must be greater than or equal to 1, got 0");
    }

    #[test]
    fn test_validation_errors_are_client_errors() {
        let err: CriteriaError =
            ValidationErrors::from(ValidationError::new("orderBy", "bad", "criteriaOrderBy.invalidValue")).into();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_operational_error_lists_tables() {
        let err = OperationalError::MultipleSourceTables(vec!["users".into(), "orders".into()]);
        assert_eq!(
            err.to_string(),
            "keyset pagination needs exactly one source table, found 2: users, orders"
        );
        assert!(!CriteriaError::from(err).is_client_error());
    }
}
