// Public handlers need no token; user handlers run behind jwt_auth_middleware.
pub mod auth;
pub mod health;
pub mod user;
