use sqlx::{self, postgres::PgRow, FromRow, PgExecutor, Row};

use crate::database::manager::DatabaseError;
use crate::pagination::filter_order::FilterOrder;
use crate::pagination::filter_where::FilterWhere;
use crate::pagination::paginate::build_limit_clause;
use crate::pagination::{Column, FilterParams, OrderParam, PaginationParam, SqlResult};

/// Assembles `SELECT` and `COUNT` statements for one table from parsed list
/// parameters. Clauses are applied as WHERE, then ORDER BY, then LIMIT.
pub struct QueryBuilder<T> {
    table_name: String,
    columns: &'static [Column],
    filters: FilterParams,
    order: OrderParam,
    page: PaginationParam,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, columns: &'static [Column]) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            columns,
            filters: vec![],
            order: OrderParam::default(),
            page: PaginationParam::default(),
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filters: FilterParams) -> Self {
        self.filters = filters;
        self
    }

    pub fn order(mut self, order: OrderParam) -> Self {
        self.order = order;
        self
    }

    pub fn paginate(mut self, page: PaginationParam) -> Self {
        self.page = page;
        self
    }

    pub fn to_sql(&self) -> Result<SqlResult, DatabaseError> {
        let (where_clause, params) = FilterWhere::generate(&self.filters, self.columns)?;
        let order_clause = FilterOrder::generate(&self.order, self.columns)?;
        let limit_clause = build_limit_clause(&self.page);

        let query = [
            format!("SELECT * FROM \"{}\"", self.table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    /// Count over the filtered set, ignoring order and pagination.
    pub fn to_count_sql(&self) -> Result<SqlResult, DatabaseError> {
        let (where_clause, params) = FilterWhere::generate(&self.filters, self.columns)?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table_name)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", self.table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    pub async fn select_all<'e>(&self, executor: impl PgExecutor<'e>) -> Result<Vec<T>, DatabaseError> {
        fetch_all(&self.to_sql()?, executor).await
    }
}

/// Runs a rendered select, binding every parameter as text.
pub async fn fetch_all<'e, T>(sql: &SqlResult, executor: impl PgExecutor<'e>) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(query = %sql.query, params = ?sql.params, "select");
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = q.bind(p.as_str());
    }
    Ok(q.fetch_all(executor).await?)
}

/// Runs a rendered `COUNT(*) AS count` statement.
pub async fn fetch_count<'e>(sql: &SqlResult, executor: impl PgExecutor<'e>) -> Result<i64, DatabaseError> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = q.bind(p.as_str());
    }
    let row = q.fetch_one(executor).await?;
    Ok(row.try_get("count")?)
}

pub(crate) fn validate_table_name(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DatabaseError::InvalidTableName(name.to_string()));
    }
    Ok(())
}
