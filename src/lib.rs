//! Filter, sort and pagination criteria for relational queries and in-memory results.
//!
//! - [`filtering`]: request criteria and their translation to `sea_query` conditions
//! - [`QueryBuilder`](crate::core::QueryBuilder): one SELECT per request, with keyset pagination
//! - [`memory::FilterCriteria`]: the same criteria over already-fetched records

pub mod config;
pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod memory;
pub mod validation;

pub use config::CriteriaConfig;
pub use crate::core::{Filterable, Paginatable, QueryBuilder, RowCounter, Sortable};
pub use database::ConnectionCounter;
pub use errors::{CriteriaError, CriteriaResult, OperationalError, PagingError};
pub use filtering::{
    CriteriaDto, CriteriaExt, FieldFilter, FieldPath, FilterSpec, FilterValue, PageInfo, PagingSpec, Scalar,
    SortDirection, SortSpec,
};
pub use memory::{FilterCriteria, ResultSet};
pub use validation::{ValidationError, ValidationErrors};
