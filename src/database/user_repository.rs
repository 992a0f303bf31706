use sqlx::{PgConnection, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::database::repository::Repository;

/// Generic repository plus the writes that need the full user row.
pub struct UserRepository {
    inner: Repository<User>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Repository::new(pool),
        }
    }

    /// Insert, or overwrite the row with the same id.
    pub async fn create(&self, conn: &mut PgConnection, user: &User) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO \"{}\" (id, username, email, password, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
             username = EXCLUDED.username, email = EXCLUDED.email, password = EXCLUDED.password, \
             updated_at = EXCLUDED.updated_at \
             RETURNING *",
            self.inner.table_name()
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(user.username.as_deref())
            .bind(user.email.as_deref())
            .bind(user.password.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(conn)
            .await?)
    }

    /// Returns `None` when no row has the given id.
    pub async fn update(&self, conn: &mut PgConnection, user: &User) -> Result<Option<User>, DatabaseError> {
        let query = format!(
            "UPDATE \"{}\" SET username = $2, email = $3, password = $4, updated_at = $5 \
             WHERE id = $1 RETURNING *",
            self.inner.table_name()
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(user.username.as_deref())
            .bind(user.email.as_deref())
            .bind(user.password.as_str())
            .bind(user.updated_at)
            .fetch_optional(conn)
            .await?)
    }
}

impl std::ops::Deref for UserRepository {
    type Target = Repository<User>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
