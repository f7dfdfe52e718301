//! Page / per-page parameters and the keyset pagination plan.
//!
//! Offset pagination makes the database walk `offset` rows before returning anything.
//! The keyset plan instead seeks on a monotonically increasing primary key: page 1
//! starts at `pk >= 1`, and page `n` starts after the largest key among the first
//! `per_page * (n - 1)` rows, which the primary-key index answers without a full scan.

use serde::{Deserialize, Serialize};

use crate::errors::PagingError;

/// Validated `(page >= 1, per_page >= 1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPaging")]
pub struct PagingSpec {
    page: u64,
    per_page: u64,
}

#[derive(Deserialize)]
struct RawPaging {
    page: i64,
    per_page: i64,
}

impl TryFrom<RawPaging> for PagingSpec {
    type Error = PagingError;

    fn try_from(raw: RawPaging) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.per_page)
    }
}

impl PagingSpec {
    /// # Errors
    ///
    /// [`PagingError::InvalidPage`] or [`PagingError::InvalidPerPage`] for values below 1.
    pub fn new(page: i64, per_page: i64) -> Result<Self, PagingError> {
        let page = u64::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PagingError::InvalidPage(page))?;
        let per_page = u64::try_from(per_page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PagingError::InvalidPerPage(per_page))?;
        Ok(Self { page, per_page })
    }

    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Rows preceding this page
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Totals reported alongside a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total_count: u64,
    pub total_pages: u64,
}

impl PageInfo {
    #[must_use]
    pub fn new(paging: &PagingSpec, total_count: u64) -> Self {
        Self {
            page: paging.page,
            per_page: paging.per_page,
            total_count,
            total_pages: total_count.div_ceil(paging.per_page),
        }
    }

    /// No rows, or the requested page lies past the last one
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        self.total_count == 0 || self.page > self.total_pages
    }
}

/// What the keyset paginator will do to the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeysetPlan {
    /// Replace the query with a zero-row shape
    Empty,
    /// `pk >= 1 ORDER BY pk ASC LIMIT limit`
    FirstPage { limit: u64 },
    /// `pk > (max pk of the first boundary_rows rows) ORDER BY pk ASC LIMIT limit`
    After { boundary_rows: u64, limit: u64 },
}

impl KeysetPlan {
    #[must_use]
    pub fn for_page(info: &PageInfo) -> Self {
        if info.is_out_of_range() {
            Self::Empty
        } else if info.page == 1 {
            Self::FirstPage { limit: info.per_page }
        } else {
            Self::After {
                boundary_rows: info.per_page.saturating_mul(info.page - 1),
                limit: info.per_page,
            }
        }
    }
}
