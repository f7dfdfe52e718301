#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use boilerwork_criteria::{CriteriaResult, RowCounter};
use sea_orm::sea_query::{PostgresQueryBuilder, SelectStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use serde_json::{Value, json};

pub mod product_entity;

/// Route `tracing` output through the test harness; set `RUST_LOG=debug` to see it
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory `SQLite` database with `rows` products numbered from 1
pub async fn setup_products_db(rows: i64) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    db.execute_unprepared(
        "CREATE TABLE products (
            id_primary INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            price INTEGER NOT NULL,
            active BOOLEAN NOT NULL
        )",
    )
    .await?;

    for id in 1..=rows {
        let active = i64::from(id % 2 == 1);
        db.execute_unprepared(&format!(
            "INSERT INTO products (id_primary, name, price, active) VALUES ({id}, 'product {id}', {}, {active})",
            id * 10
        ))
        .await?;
    }

    Ok(db)
}

/// Primary keys returned by `statement` against `db`
pub async fn fetch_ids(db: &DatabaseConnection, statement: &SelectStatement) -> Result<Vec<i64>, DbErr> {
    let rows = db.query_all(db.get_database_backend().build(statement)).await?;
    rows.iter()
        .map(|row| row.try_get::<i64>("", "id_primary"))
        .collect()
}

/// Counter returning a fixed total and recording the statements it was asked to count
#[derive(Debug, Default)]
pub struct StubCounter {
    pub total: u64,
    pub seen: Mutex<Vec<String>>,
}

impl StubCounter {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowCounter for StubCounter {
    async fn count(&self, statement: &SelectStatement) -> CriteriaResult<u64> {
        self.seen
            .lock()
            .unwrap()
            .push(statement.to_string(PostgresQueryBuilder));
        Ok(self.total)
    }
}

/// The three-person fixture with nested tags and addresses
pub fn people() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "John",
            "tags": ["programming", "sports"],
            "details": {"age": 25, "address": {"city": "New York", "country": "USA"}}
        }),
        json!({
            "id": 2,
            "name": "Jane",
            "tags": ["design", "art"],
            "details": {"age": 30, "address": {"city": "Los Angeles", "country": "USA"}}
        }),
        json!({
            "id": 3,
            "name": "Jack",
            "tags": ["sports", "travel"],
            "details": {"age": 35, "address": {"city": "London", "country": "UK"}}
        }),
    ]
}

/// `[{"id": 1, "name": ..}, ..]` for `n` records
pub fn numbered(n: i64) -> Vec<Value> {
    const NAMES: [&str; 10] = [
        "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Heidi", "Ivan", "Judy",
    ];
    (1..=n)
        .map(|id| {
            let name = usize::try_from(id - 1).ok().and_then(|i| NAMES.get(i)).copied().unwrap_or("Zed");
            json!({"id": id, "name": name})
        })
        .collect()
}

pub fn ids(records: &[Value]) -> Vec<i64> {
    records.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}
