use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbErr, sea_query::SelectStatement};

use crate::core::RowCounter;
use crate::core::query_builder::COUNT_COLUMN;
use crate::errors::CriteriaResult;

/// [`RowCounter`] over any `sea_orm` connection or transaction.
///
/// The statement is rendered with the connection's own backend, so the same count
/// works against PostgreSQL in production and `SQLite` in tests.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionCounter<'a, C> {
    conn: &'a C,
}

impl<'a, C> ConnectionCounter<'a, C> {
    #[must_use]
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> RowCounter for ConnectionCounter<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn count(&self, statement: &SelectStatement) -> CriteriaResult<u64> {
        let backend = self.conn.get_database_backend();
        let row = self
            .conn
            .query_one(backend.build(statement))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("count query returned no row".to_string()))?;
        let total: i64 = row.try_get("", COUNT_COLUMN)?;
        tracing::debug!(total, "counted rows for pagination");
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
