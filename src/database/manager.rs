use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::pagination::QueryParamError;

/// Errors from the data access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error(transparent)]
    InvalidQuery(#[from] QueryParamError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection string from `DATABASE_URL`, or composed from the individual
/// `DB_*` settings.
pub fn build_connection_string(config: &DatabaseConfig) -> Result<String, DatabaseError> {
    if let Some(url) = &config.url {
        let url = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        return Ok(url.into());
    }

    let mut url = url::Url::parse(&format!("postgres://{}:{}", config.host, config.port))
        .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    url.set_path(&format!("/{}", config.database));
    url.set_username(&config.username)
        .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if !config.password.is_empty() {
        url.set_password(Some(&config.password))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    Ok(url.into())
}

/// Build the pool without opening a connection; the first query connects.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let connection_string = build_connection_string(config)?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_lazy(&connection_string)?;

    info!(
        "Created database pool for {}:{}/{}",
        config.host, config.port, config.database
    );
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
