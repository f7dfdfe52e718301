//! # In-Memory Criteria
//!
//! The same filter vocabulary as the SQL translator, evaluated directly over records
//! that were already fetched, typically search hits that need post-filtering the
//! search backend cannot do.
//!
//! Records are `serde_json::Value`s. Dotted field paths walk nested objects and
//! arrays; a record where the path does not exist never matches.

pub mod filter_criteria;
pub mod matcher;
pub mod path;
pub mod result_set;

pub use filter_criteria::FilterCriteria;
pub use matcher::{SortKey, normalize_text, record_matches, value_matches};
pub use path::{resolve, resolve_first};
pub use result_set::ResultSet;
