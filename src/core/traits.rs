use async_trait::async_trait;
use sea_orm::sea_query::SelectStatement;

use crate::errors::CriteriaResult;
use crate::filtering::{FilterSpec, PagingSpec, SortSpec};

/// Record sequences that can be narrowed by a filter spec
pub trait Filterable: Sized {
    /// Records matching every predicate, in their original order
    #[must_use]
    fn filtered(&self, spec: &FilterSpec) -> Self;
}

/// Record sequences that can be reordered by one field
pub trait Sortable: Sized {
    /// Stable ordering; an unknown field leaves the order untouched
    #[must_use]
    fn sorted(&self, sort: &SortSpec) -> Self;
}

/// Record sequences that can be sliced into pages
pub trait Paginatable: Sized {
    /// The requested page; a page past the end is empty
    #[must_use]
    fn paged(&self, paging: &PagingSpec) -> Self;
}

/// Counts the rows a statement would return.
///
/// Keyset pagination needs the total before it can decide which page plan to apply.
/// Implement this for whatever executes queries in your service; [`ConnectionCounter`]
/// covers any `sea_orm` connection.
///
/// [`ConnectionCounter`]: crate::database::ConnectionCounter
#[async_trait]
pub trait RowCounter: Send + Sync {
    /// `statement` selects a single `total` column
    async fn count(&self, statement: &SelectStatement) -> CriteriaResult<u64>;
}
