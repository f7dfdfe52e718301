// Query session and the capability traits shared by both criteria engines

pub mod query_builder;
pub mod traits;

// Re-export commonly used items
pub use query_builder::QueryBuilder;
pub use traits::{Filterable, Paginatable, RowCounter, Sortable};
