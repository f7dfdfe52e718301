use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::matcher::{SortKey, record_matches};
use crate::core::{Filterable, Paginatable, Sortable};
use crate::filtering::{FilterSpec, PagingSpec, SortDirection, SortSpec};

/// Ordered, already-fetched records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(Vec<Value>);

impl ResultSet {
    #[must_use]
    pub fn new(records: Vec<Value>) -> Self {
        Self(records)
    }

    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Value> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for ResultSet {
    fn from(records: Vec<Value>) -> Self {
        Self(records)
    }
}

impl FromIterator<Value> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Filterable for ResultSet {
    fn filtered(&self, spec: &FilterSpec) -> Self {
        self.0
            .iter()
            .filter(|record| spec.iter().all(|filter| record_matches(record, filter)))
            .cloned()
            .collect()
    }
}

impl Sortable for ResultSet {
    fn sorted(&self, sort: &SortSpec) -> Self {
        let mut keyed: Vec<(Option<SortKey>, &Value)> = self
            .0
            .iter()
            .map(|record| (SortKey::of(record, &sort.field), record))
            .collect();

        if keyed.iter().all(|(key, _)| key.is_none()) {
            tracing::debug!(field = %sort.field, "no record has the sort field, keeping original order");
            return self.clone();
        }

        // sort_by is stable; records without a key stay last in either direction
        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => match sort.direction {
                SortDirection::Asc => a.compare(b),
                SortDirection::Desc => b.compare(a),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        keyed.into_iter().map(|(_, record)| record.clone()).collect()
    }
}

impl Paginatable for ResultSet {
    fn paged(&self, paging: &PagingSpec) -> Self {
        let start = usize::try_from(paging.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(paging.per_page()).unwrap_or(usize::MAX);
        self.0.iter().skip(start).take(take).cloned().collect()
    }
}
