use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use crate::database::models::{ListUserResp, User, UserLogin};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::pagination::{parse_pagination_params, ListQuery, ListReq};
use crate::routes::AppState;

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<UserLogin>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = body?;
    let user = state.users.create(body).await?;
    tracing::debug!(by = %auth.username, user_id = %user.id, "create user");
    Ok(ApiResponse::created(user))
}

/// GET /users?page=&pageSize=&sort=&filter=
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<ListUserResp> {
    let Query(query) = query?;
    let (page, order, filter) = parse_pagination_params(&query)?;
    let result = state.users.list(ListReq { page, order, filter }).await?;
    Ok(ApiResponse::success(result))
}

/// GET /users/:id
pub async fn find_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let user = state.users.find_one(&id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UserLogin>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = body?;
    let user = state.users.update(&id, body).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /users/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = state.users.delete(&id).await?;
    Ok(ApiResponse::message(format!("{} has been deleted", id)))
}
