//! # Query Session
//!
//! [`QueryBuilder`] accumulates one SELECT for the duration of a request: source tables,
//! joins, WHERE conditions, ordering and limit. Criteria and keyset pagination are
//! applied on top of that state, and the finished statement is rendered through
//! `sea_query`.
//!
//! The builder tracks its FROM and JOIN tables itself because keyset pagination must
//! refuse any query with more than one source table.
//!
//! ```rust,ignore
//! let mut query = QueryBuilder::new();
//! query.from("users").add_criteria(&criteria);
//! let page = query.add_paging(&PagingSpec::new(2, 25)?, &ConnectionCounter::new(&db)).await?;
//! let (sql, values) = query.build();
//! ```

use sea_orm::{
    Condition, Value,
    sea_query::{
        Alias, Asterisk, Expr, Func, IntoCondition, JoinType, Order, PostgresQueryBuilder, Query,
        SelectStatement, SimpleExpr, SubQueryStatement, Values,
    },
};

use super::traits::RowCounter;
use crate::config::CriteriaConfig;
use crate::errors::{CriteriaResult, OperationalError};
use crate::filtering::{
    CriteriaDto, FilterSpec, KeysetPlan, PageInfo, PagingSpec, SortDirection, SortSpec, filter_condition,
    sort_expr,
};
use crate::validation::ValidationErrors;

/// Alias of the derived table holding the rows before the requested page
const BOUNDARY_ALIAS: &str = "max_id";
/// Alias of the keyset page when the caller's ordering is applied around it
const PAGE_ALIAS: &str = "page";
/// Alias of the wrapped query when counting grouped or distinct selections
const COUNT_SOURCE_ALIAS: &str = "count_source";
/// Column the count statement exposes
pub const COUNT_COLUMN: &str = "total";

#[derive(Debug, Clone)]
struct Join {
    kind: JoinType,
    table: String,
    on: Condition,
}

/// `users`, `*`, `u.name` or `u.*`
fn column_expr(name: &str) -> SimpleExpr {
    match name.split_once('.') {
        _ if name == "*" => Expr::col(Asterisk).into(),
        Some((table, "*")) => Expr::col((Alias::new(table), Asterisk)).into(),
        Some((table, column)) => Expr::col((Alias::new(table), Alias::new(column))).into(),
        None => Expr::col(Alias::new(name)).into(),
    }
}

/// Mutable SELECT under construction for one request
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    config: CriteriaConfig,
    columns: Vec<String>,
    tables: Vec<String>,
    joins: Vec<Join>,
    conditions: Vec<Condition>,
    group_by: Vec<String>,
    orders: Vec<(SimpleExpr, Order)>,
    limit: Option<u64>,
    /// Page size once keyset pagination is applied
    keyset_limit: Option<u64>,
    distinct: bool,
    zero_rows: bool,
}

impl QueryBuilder {
    /// Session using [`CriteriaConfig::default`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns the configuration's validation errors; its identifiers are spliced into SQL.
    pub fn with_config(config: CriteriaConfig) -> Result<Self, ValidationErrors> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn config(&self) -> &CriteriaConfig {
        &self.config
    }

    /// Columns to select; nothing selected means `*`
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.tables.push(table.into());
        self
    }

    pub fn join(&mut self, kind: JoinType, table: impl Into<String>, on: impl IntoCondition) -> &mut Self {
        self.joins.push(Join {
            kind,
            table: table.into(),
            on: on.into_condition(),
        });
        self
    }

    pub fn and_where(&mut self, condition: impl IntoCondition) -> &mut Self {
        self.conditions.push(condition.into_condition());
        self
    }

    /// Raw predicate with `$n` placeholders numbered from 1 within `sql`
    pub fn and_where_raw<I>(&mut self, sql: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.and_where(Expr::cust_with_values(sql, values))
    }

    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.group_by.push(column.into());
        self
    }

    pub fn order_by(&mut self, column: &str, direction: SortDirection) -> &mut Self {
        self.orders.push((column_expr(column), direction.into()));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// AND the filter spec into the WHERE clause
    pub fn add_filters(&mut self, spec: &FilterSpec) -> &mut Self {
        let condition = filter_condition(spec, &self.config.unaccent_function);
        if !condition.is_empty() {
            self.conditions.push(condition);
        }
        self
    }

    pub fn add_sorting(&mut self, sort: &SortSpec) -> &mut Self {
        if let Some(order) = sort_expr(sort, &self.config.unaccent_function) {
            self.orders.push(order);
        }
        self
    }

    /// Filters, then the optional ordering, of a validated criteria bundle
    pub fn add_criteria(&mut self, criteria: &CriteriaDto) -> &mut Self {
        self.add_filters(criteria.params());
        if let Some(sort) = criteria.order_by() {
            self.add_sorting(sort);
        }
        self
    }

    /// FROM tables followed by joined tables, in the order they were added
    #[must_use]
    pub fn source_tables(&self) -> Vec<&str> {
        self.tables
            .iter()
            .map(String::as_str)
            .chain(self.joins.iter().map(|j| j.table.as_str()))
            .collect()
    }

    /// Same sources and filters, selecting only `COUNT(*) AS total`
    #[must_use]
    pub fn count_statement(&self) -> SelectStatement {
        let count = Expr::cust("COUNT(*)");
        if self.distinct || !self.group_by.is_empty() {
            let mut grouped = self.filtered_source();
            self.apply_projection(&mut grouped);
            Query::select()
                .expr_as(count, Alias::new(COUNT_COLUMN))
                .from_subquery(grouped, Alias::new(COUNT_SOURCE_ALIAS))
                .to_owned()
        } else {
            let mut statement = self.filtered_source();
            statement.expr_as(count, Alias::new(COUNT_COLUMN));
            statement
        }
    }

    /// Rewrite the query for the requested page given the filtered row count.
    ///
    /// The page itself is selected in primary key order. Any ordering added earlier is
    /// applied to that page from an outer `SELECT * FROM (...) AS page`, so it must
    /// refer to selected columns without a table qualifier.
    ///
    /// # Errors
    ///
    /// [`OperationalError::MissingSource`] without a FROM table and
    /// [`OperationalError::MultipleSourceTables`] with more than one source table.
    pub fn apply_keyset(&mut self, paging: &PagingSpec, total_count: u64) -> CriteriaResult<PageInfo> {
        let table = self.single_source()?;
        let info = PageInfo::new(paging, total_count);
        let plan = KeysetPlan::for_page(&info);
        tracing::debug!(
            table = %table,
            page = info.page,
            per_page = info.per_page,
            total_count,
            ?plan,
            "applying keyset pagination"
        );

        match plan {
            KeysetPlan::Empty => self.zero_rows = true,
            KeysetPlan::FirstPage { limit } => {
                self.conditions.push(self.first_key_condition());
                self.seek(limit);
            }
            KeysetPlan::After { boundary_rows, limit } => {
                let boundary = self.boundary_subquery(&table, boundary_rows);
                self.conditions
                    .push(Expr::col(self.primary_key()).gt(boundary).into_condition());
                self.seek(limit);
            }
        }
        Ok(info)
    }

    /// Count the filtered rows with `counter`, then apply [`Self::apply_keyset`].
    ///
    /// The source table check runs before the count, so a refused query never reaches
    /// the database.
    ///
    /// # Errors
    ///
    /// Operational errors from [`Self::apply_keyset`] and whatever `counter` returns.
    pub async fn add_paging<C>(&mut self, paging: &PagingSpec, counter: &C) -> CriteriaResult<PageInfo>
    where
        C: RowCounter + ?Sized,
    {
        self.single_source()?;
        let total = counter.count(&self.count_statement()).await?;
        self.apply_keyset(paging, total)
    }

    /// The statement as currently configured
    #[must_use]
    pub fn statement(&self) -> SelectStatement {
        if self.zero_rows {
            return Query::select().expr(Expr::cust("1")).limit(0).to_owned();
        }

        let mut statement = self.filtered_source();
        self.apply_projection(&mut statement);

        if let Some(page_size) = self.keyset_limit {
            statement.order_by(self.primary_key(), Order::Asc).limit(page_size);
            if self.orders.is_empty() {
                return statement;
            }
            let mut page = Query::select()
                .column(Asterisk)
                .from_subquery(statement, Alias::new(PAGE_ALIAS))
                .to_owned();
            self.apply_orders(&mut page);
            return page;
        }

        self.apply_orders(&mut statement);
        if let Some(limit) = self.limit {
            statement.limit(limit);
        }
        statement
    }

    /// PostgreSQL text plus bound values
    #[must_use]
    pub fn build(&self) -> (String, Values) {
        self.statement().build(PostgresQueryBuilder)
    }

    /// PostgreSQL text with values inlined, for logs and assertions
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.statement().to_string(PostgresQueryBuilder)
    }

    fn primary_key(&self) -> Alias {
        Alias::new(&self.config.primary_column)
    }

    fn where_condition(&self) -> Condition {
        self.conditions
            .iter()
            .cloned()
            .fold(Condition::all(), Condition::add)
    }

    /// FROM, JOIN and WHERE only
    fn filtered_source(&self) -> SelectStatement {
        let mut statement = Query::select();
        for table in &self.tables {
            statement.from(Alias::new(table));
        }
        for join in &self.joins {
            statement.join(join.kind, Alias::new(&join.table), join.on.clone());
        }
        let condition = self.where_condition();
        if !condition.is_empty() {
            statement.cond_where(condition);
        }
        statement
    }

    fn apply_projection(&self, statement: &mut SelectStatement) {
        if self.columns.is_empty() {
            statement.column(Asterisk);
        } else {
            statement.exprs(self.columns.iter().map(|c| column_expr(c)));
        }
        if !self.group_by.is_empty() {
            statement.add_group_by(self.group_by.iter().map(|c| column_expr(c)));
        }
        if self.distinct {
            statement.distinct();
        }
    }

    fn apply_orders(&self, statement: &mut SelectStatement) {
        for (expr, order) in &self.orders {
            statement.order_by_expr(expr.clone(), order.clone());
        }
    }

    fn single_source(&self) -> CriteriaResult<String> {
        let tables = self.source_tables();
        match tables.as_slice() {
            [] => {
                tracing::error!("keyset pagination refused: query has no FROM table");
                Err(OperationalError::MissingSource.into())
            }
            [table] => Ok((*table).to_string()),
            _ => {
                tracing::error!(tables = ?tables, "keyset pagination refused: query has more than one source table");
                Err(OperationalError::MultipleSourceTables(tables.iter().map(|t| (*t).to_string()).collect()).into())
            }
        }
    }

    fn first_key_condition(&self) -> Condition {
        Expr::col(self.primary_key()).gte(1).into_condition()
    }

    /// `(SELECT max(max_id.pk) FROM (SELECT pk ... LIMIT rows) AS max_id LIMIT 1)`
    fn boundary_subquery(&self, table: &str, rows: u64) -> SimpleExpr {
        let pk = self.primary_key();
        let preceding = Query::select()
            .column(pk.clone())
            .from(Alias::new(table))
            .cond_where(self.where_condition().add(self.first_key_condition()))
            .order_by(pk.clone(), Order::Asc)
            .limit(rows)
            .to_owned();
        let boundary = Query::select()
            .expr(Func::max(Expr::col((Alias::new(BOUNDARY_ALIAS), pk))))
            .from_subquery(preceding, Alias::new(BOUNDARY_ALIAS))
            .limit(1)
            .to_owned();
        SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(boundary)))
    }

    fn seek(&mut self, limit: u64) {
        if !self.orders.is_empty() {
            tracing::debug!(orders = self.orders.len(), "ordering applied around the keyset page");
        }
        self.keyset_limit = Some(limit);
    }
}
