//! Criteria configuration.
//!
//! Settings are plain serde structs so they can be embedded in whatever configuration
//! document the host service loads. Every field has a default, so an empty section is
//! valid:
//!
//! ```yaml
//! criteria:
//!   primary_column: id_primary
//!   unaccent_function: immutable_unaccent
//! ```

use serde::{Deserialize, Serialize};

use crate::filtering::conditions::is_sql_identifier;
use crate::validation::{ValidationError, ValidationErrors};

pub const DEFAULT_PRIMARY_COLUMN: &str = "id_primary";
pub const DEFAULT_UNACCENT_FUNCTION: &str = "immutable_unaccent";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CriteriaConfig {
    /// Monotonically increasing key used by keyset pagination.
    pub primary_column: String,
    /// SQL function removing diacritics. Must be IMMUTABLE to be usable in indexes.
    pub unaccent_function: String,
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        Self {
            primary_column: DEFAULT_PRIMARY_COLUMN.to_string(),
            unaccent_function: DEFAULT_UNACCENT_FUNCTION.to_string(),
        }
    }
}

impl CriteriaConfig {
    /// Both settings are spliced into SQL text, so they must be plain identifiers.
    ///
    /// # Errors
    ///
    /// Returns every setting that is not a plain SQL identifier.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_sql_identifier(&self.primary_column) {
            errors.add(ValidationError::new(
                "primary_column",
                "Primary column must be a plain SQL identifier",
                "criteriaConfig.primaryColumn",
            ));
        }
        if !is_sql_identifier(&self.unaccent_function) {
            errors.add(ValidationError::new(
                "unaccent_function",
                "Unaccent function must be a plain SQL identifier",
                "criteriaConfig.unaccentFunction",
            ));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CriteriaConfig::default();
        assert_eq!(cfg.primary_column, "id_primary");
        assert_eq!(cfg.unaccent_function, "immutable_unaccent");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let cfg: CriteriaConfig = serde_json::from_str(r#"{"primary_column": "seq"}"#).unwrap();
        assert_eq!(cfg.primary_column, "seq");
        assert_eq!(cfg.unaccent_function, DEFAULT_UNACCENT_FUNCTION);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let parsed = serde_json::from_str::<CriteriaConfig>(r#"{"primary": "id"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_injection_in_settings_rejected() {
        let cfg = CriteriaConfig {
            primary_column: "id; DROP TABLE users".into(),
            unaccent_function: "unaccent(".into(),
        };
        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
