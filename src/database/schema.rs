use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::database::query_builder::validate_table_name;
use crate::database::repository::Entity;

fn users_table_ddl(table: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (\
             id uuid PRIMARY KEY, \
             username text, \
             email text, \
             password text NOT NULL, \
             created_at timestamptz NOT NULL DEFAULT now(), \
             updated_at timestamptz NOT NULL DEFAULT now())"
        ),
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS \"{table}_username_lower_idx\" ON \"{table}\" (lower(username))"
        ),
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS \"{table}_email_lower_idx\" ON \"{table}\" (lower(email))"
        ),
    ]
}

/// Create the tables this service owns when they are missing.
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let table = User::table_name();
    validate_table_name(&table)?;

    let mut tx = pool.begin().await?;
    for statement in users_table_ddl(&table) {
        sqlx::query(&statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Schema ready for table {}", table);
    Ok(())
}
