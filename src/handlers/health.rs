use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::config;
use crate::database::manager;
use crate::routes::AppState;

/// GET / - service information
pub async fn root() -> Json<Value> {
    let app = &config::config().app;
    Json(json!({
        "response_code": 200,
        "response_message": "success",
        "data": {
            "name": app.name,
            "version": app.version,
            "endpoints": {
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login (public)",
                "users": "/users[/:id] (protected)",
            },
            "list_parameters": {
                "page": "page number, default 1",
                "pageSize": "rows per page, default -1 (all)",
                "sort": "field:asc|desc",
                "filter": "field:value:op joined by |, op in eq lt gt lte gte in like is not",
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match manager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "response_code": 200,
                "response_message": "success",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "response_code": 503,
                    "response_message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
