pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod middleware;
pub mod pagination;
pub mod routes;
pub mod services;
