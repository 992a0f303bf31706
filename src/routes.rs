use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::HttpAppConfig;
use crate::error::ApiError;
use crate::handlers::{auth, health, user};
use crate::middleware::jwt_auth_middleware;
use crate::services::UserService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserService::new(pool.clone())),
            pool,
        }
    }
}

pub fn app(state: AppState, http: &HttpAppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(auth_public_routes())
        // Protected
        .merge(user_routes())
        .with_state(state)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(http))
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(user::create).get(user::list))
        .route(
            "/users/:id",
            get(user::find_one).put(user::update).delete(user::delete),
        )
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer(http: &HttpAppConfig) -> CorsLayer {
    let origins = if http.allow_origins.is_empty() || http.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(AnyOrigin)
    } else {
        AllowOrigin::list(
            http.allow_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let methods: Vec<Method> = if http.allow_methods.is_empty() {
        vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS]
    } else {
        http.allow_methods
            .iter()
            .filter_map(|m| m.to_ascii_uppercase().parse().ok())
            .collect()
    };

    let headers = if http.allow_headers.is_empty() {
        AllowHeaders::from(AnyOrigin)
    } else {
        AllowHeaders::list(
            http.allow_headers
                .iter()
                .filter_map(|h| h.parse().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal_server_error("Internal server error").into_response()
}
