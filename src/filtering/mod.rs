//! # Criteria Filtering & Sorting
//!
//! Translation of request criteria into SQL conditions and orderings. Criteria arrive
//! as loosely typed JSON, are resolved once into typed values, and are then applied to
//! a `sea_query` statement with every text value bound as a parameter.
//!
//! ## Main Components
//!
//! - **[`FilterSpec`]**: field path to [`FilterValue`] mapping, AND across fields
//! - **[`SortSpec`]**: one `(field, direction)` ordering
//! - **[`CriteriaDto`]**: validated `{params, orderBy, language}` bundle
//! - **[`filter_condition`]** / **[`sort_expr`]**: the SQL translation itself
//! - **[`PagingSpec`]** / **[`PageInfo`]**: page parameters and totals
//! - **[`CriteriaExt`]**: applies criteria to statements built elsewhere
//!
//! ## Filter Value Examples
//!
//! ```rust,ignore
//! {"name": "José"}                 // lower(unaccent("name"::TEXT)) = lower(unaccent($1))
//! {"data.address.city": "Madrid"}  // "data" -> 'address' ->> 'city'
//! {"active": true}                 // active = $1
//! {"deleted_at": "null"}           // deleted_at IS NULL
//! {"price": "≥10"}                 // price >= $1
//! {"age": "20-40"}                 // age BETWEEN $1 AND $2
//! {"status": ["open", "closed"]}   // (... = $1 OR ... = $2)
//! ```
//!
//! ## Sorting
//!
//! Order-by clauses use the `field,DIRECTION` grammar and must name a field already
//! present among the filter keys:
//!
//! ```rust,ignore
//! let params = FilterSpec::from_json(&json!({"name": "Ana"}))?;
//! let criteria = CriteriaDto::create(params, Some("name,DESC"), Some("es"))?;
//! ```

pub mod conditions;
pub mod criteria;
pub mod ext;
pub mod pagination;
pub mod sort;
pub mod spec;
pub mod value;

// Re-export commonly used items
pub use conditions::{field_condition, filter_condition, is_sql_identifier, json_text_expr};
pub use criteria::CriteriaDto;
pub use ext::CriteriaExt;
pub use pagination::{KeysetPlan, PageInfo, PagingSpec};
pub use sort::sort_expr;
pub use spec::{FieldFilter, FieldPath, FilterSpec, PATH_SEPARATOR, SortDirection, SortSpec};
pub use value::{FilterValue, Scalar};
