//! Filter, sort and paginate pipeline over an already-fetched result set.

use serde_json::Value;

use super::result_set::ResultSet;
use crate::core::{Filterable, Paginatable, Sortable};
use crate::errors::PagingError;
use crate::filtering::{FilterSpec, PageInfo, PagingSpec, SortSpec};

/// Chainable post-processing of search results and other in-memory records.
///
/// Every stage consumes the pipeline and returns a new one, so intermediate stages can
/// be kept and reused. The usual order is filter, sort, paginate:
///
/// ```rust,ignore
/// let page = FilterCriteria::new()
///     .set_data(hits)
///     .post_filter(&FilterSpec::from_json(&json!({"tags": "sports"}))?)
///     .order_by(&SortSpec::parse("age", "desc")?)
///     .paginate(1, 20)?
///     .into_results();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    data: ResultSet,
    page_info: Option<PageInfo>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records and forget any previous page info
    #[must_use]
    pub fn set_data(self, data: impl Into<ResultSet>) -> Self {
        Self {
            data: data.into(),
            page_info: None,
        }
    }

    #[must_use]
    pub fn post_filter(self, spec: &FilterSpec) -> Self {
        let data = self.data.filtered(spec);
        tracing::debug!(filters = spec.len(), kept = data.len(), "post-filtered records");
        Self { data, ..self }
    }

    #[must_use]
    pub fn order_by(self, sort: &SortSpec) -> Self {
        Self {
            data: self.data.sorted(sort),
            ..self
        }
    }

    /// # Errors
    ///
    /// [`PagingError`] when `page` or `per_page` is below 1; the records are not touched.
    pub fn paginate(self, page: i64, per_page: i64) -> Result<Self, PagingError> {
        let paging = PagingSpec::new(page, per_page)?;
        Ok(self.paginate_with(&paging))
    }

    /// Slice out one page and record its [`PageInfo`]
    #[must_use]
    pub fn paginate_with(self, paging: &PagingSpec) -> Self {
        let info = PageInfo::new(paging, self.data.len() as u64);
        Self {
            data: self.data.paged(paging),
            page_info: Some(info),
        }
    }

    #[must_use]
    pub fn get_results(&self) -> &[Value] {
        self.data.records()
    }

    #[must_use]
    pub fn into_results(self) -> Vec<Value> {
        self.data.into_records()
    }

    /// Totals of the last pagination, computed before slicing
    #[must_use]
    pub fn page_info(&self) -> Option<PageInfo> {
        self.page_info
    }
}
