use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::{User, UserLogin, UserLoginResponse};
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<UserLogin>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = body?;
    let user = state.users.create(body).await?;
    Ok(ApiResponse::created(user))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<UserLogin>, JsonRejection>,
) -> ApiResult<UserLoginResponse> {
    let Json(body) = body?;
    let login = state.users.login(body).await?;
    Ok(ApiResponse::success(login))
}
