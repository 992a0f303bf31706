use sqlx::{self, postgres::PgRow, FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::query_builder::{fetch_all, fetch_count, QueryBuilder};
use crate::pagination::filter_where::{lookup_column, quote_identifier};
use crate::pagination::{paginate, Column, FilterParams, OrderParam, PaginationData, PaginationParam};

/// A table-backed row type that the generic repository can list and filter.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Table name without the configured prefix.
    const TABLE: &'static str;

    /// Columns accepted in `filter` and `sort` parameters.
    const COLUMNS: &'static [Column];

    fn table_name() -> String {
        format!("{}{}", config::config().database.prefix, Self::TABLE)
    }
}

pub struct Repository<T> {
    table_name: String,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self::with_table_name(T::table_name(), pool)
    }

    pub fn with_table_name(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn builder(&self) -> Result<QueryBuilder<T>, DatabaseError> {
        QueryBuilder::<T>::new(&self.table_name, T::COLUMNS)
    }

    /// One page of the filtered, ordered set plus the total row count.
    pub async fn find_by_pagination(
        &self,
        page: PaginationParam,
        order: OrderParam,
        filter: FilterParams,
    ) -> Result<PaginationData<T>, DatabaseError> {
        let page = paginate::capped(page);
        let builder = self.builder()?.filter(filter).order(order).paginate(page);

        // Render both statements first so bad parameters fail before touching the pool.
        let select = builder.to_sql()?;
        let count = builder.to_count_sql()?;

        // One snapshot for the page and its total.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        let data = fetch_all(&select, &mut *tx).await?;
        let total_data = fetch_count(&count, &mut *tx).await?;
        tx.commit().await?;

        Ok(PaginationData::new(&page, data, total_data))
    }

    pub async fn find(&self, order: OrderParam, filter: FilterParams) -> Result<Vec<T>, DatabaseError> {
        self.builder()?
            .filter(filter)
            .order(order)
            .select_all(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let query = format!("SELECT * FROM \"{}\" WHERE \"id\" = $1", self.table_name);
        Ok(sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Case-insensitive equality lookup on a text column.
    pub async fn find_by_name(&self, column: &str, value: &str) -> Result<Option<T>, DatabaseError> {
        let column = lookup_column(T::COLUMNS, column)?;
        let query = format!(
            "SELECT * FROM \"{}\" WHERE lower({}::text) = lower($1) LIMIT 1",
            self.table_name,
            quote_identifier(column.name)
        );
        Ok(sqlx::query_as::<_, T>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Returns the number of deleted rows.
    pub async fn delete_by_id(&self, conn: &mut PgConnection, id: Uuid) -> Result<u64, DatabaseError> {
        let query = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", self.table_name);
        let result = sqlx::query(&query).bind(id).execute(conn).await?;
        Ok(result.rows_affected())
    }
}
