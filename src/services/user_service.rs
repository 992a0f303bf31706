use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth;
use crate::database::models::{ListUserResp, User, UserLogin, UserLoginResponse};
use crate::database::{DatabaseError, UserRepository};
use crate::error::ApiError;
use crate::pagination::ListReq;

pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    pub async fn create(&self, body: UserLogin) -> Result<User, ApiError> {
        let body = body.normalized();
        body.validate()?;
        self.ensure_unique(&body, None).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: body.username,
            email: body.email,
            password: auth::hash_password(&body.password)?,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.begin().await?;
        let user = self.repo.create(&mut tx, &user).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn login(&self, body: UserLogin) -> Result<UserLoginResponse, ApiError> {
        let body = body.normalized();
        body.validate()?;

        let mut user = None;
        if let Some(username) = &body.username {
            user = self.repo.find_by_name("username", username).await?;
        }
        if user.is_none() {
            if let Some(email) = &body.email {
                user = self.repo.find_by_name("email", email).await?;
            }
        }
        let user = user.ok_or_else(|| ApiError::not_found("username/email not found"))?;

        if !auth::verify_password(&body.password, &user.password)? {
            return Err(ApiError::forbidden("username/password unmatched"));
        }

        let subject = user.username.as_deref().or(user.email.as_deref()).unwrap_or_default();
        let token = auth::generate_jwt(subject)?;
        Ok(UserLoginResponse {
            username: user.username,
            email: user.email,
            token,
        })
    }

    pub async fn update(&self, id: &str, body: UserLogin) -> Result<User, ApiError> {
        let id = parse_user_id(id)?;
        let body = body.normalized();
        body.validate()?;
        self.ensure_unique(&body, Some(id)).await?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))?;

        let user = User {
            username: body.username,
            email: body.email,
            password: auth::hash_password(&body.password)?,
            updated_at: Utc::now(),
            ..existing
        };

        let mut tx = self.begin().await?;
        let updated = self
            .repo
            .update(&mut tx, &user)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(user_id = %updated.id, "User updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Uuid, ApiError> {
        let id = parse_user_id(id)?;

        let mut tx = self.begin().await?;
        let deleted = self.repo.delete_by_id(&mut tx, id).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("user not found"));
        }
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(user_id = %id, "User deleted");
        Ok(id)
    }

    pub async fn list(&self, req: ListReq) -> Result<ListUserResp, ApiError> {
        let page = self
            .repo
            .find_by_pagination(req.page, req.order, req.filter)
            .await?;
        Ok(page.into())
    }

    pub async fn find_one(&self, id: &str) -> Result<User, ApiError> {
        let id = parse_user_id(id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))
    }

    async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Postgres>, ApiError> {
        Ok(self.repo.pool().begin().await.map_err(DatabaseError::from)?)
    }

    /// Username and email are unique case-insensitively. `exclude` is the
    /// user being updated.
    async fn ensure_unique(&self, body: &UserLogin, exclude: Option<Uuid>) -> Result<(), ApiError> {
        let is_other = |user: &Option<User>| user.as_ref().is_some_and(|u| Some(u.id) != exclude);

        if let Some(username) = &body.username {
            if is_other(&self.repo.find_by_name("username", username).await?) {
                return Err(ApiError::forbidden("username already exists"));
            }
        }
        if let Some(email) = &body.email {
            if is_other(&self.repo.find_by_name("email", email).await?) {
                return Err(ApiError::forbidden("email already exists"));
            }
        }
        Ok(())
    }
}

fn parse_user_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request("invalid user id, must be uuid"))
}
