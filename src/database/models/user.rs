use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::database::repository::Entity;
use crate::pagination::{Column, ColumnKind, Pagination, PaginationData};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: Option<String>,
    /// bcrypt hash
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    const TABLE: &'static str = "users";

    const COLUMNS: &'static [Column] = &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("username", ColumnKind::Text),
        Column::new("email", ColumnKind::Text),
        Column::new("created_at", ColumnKind::Timestamp),
        Column::new("updated_at", ColumnKind::Timestamp),
    ];
}

/// Body of register, login and update requests.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_identity"))]
pub struct UserLogin {
    #[validate(length(min = 1, max = 255, message = "Username must be at most 255 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password")
    )]
    pub password: String,
}

impl UserLogin {
    /// Treat blank identifiers as absent.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        self.username = blank_to_none(self.username);
        self.email = blank_to_none(self.email);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLoginResponse {
    pub username: Option<String>,
    pub email: Option<String>,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListUserResp {
    pub pagination: Pagination,
    pub data: Vec<User>,
}

impl From<PaginationData<User>> for ListUserResp {
    fn from(page: PaginationData<User>) -> Self {
        Self {
            pagination: page.pagination,
            data: page.data,
        }
    }
}

/// Requires an uppercase letter, a digit and a symbol.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        let mut error = ValidationError::new("password");
        error.message = Some(
            "Password must contain an uppercase letter, a digit and a symbol".into(),
        );
        Err(error)
    }
}

fn validate_identity(login: &UserLogin) -> Result<(), ValidationError> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    if present(&login.username) || present(&login.email) {
        Ok(())
    } else {
        let mut error = ValidationError::new("identity");
        error.message = Some("either email or username must be filled".into());
        Err(error)
    }
}
