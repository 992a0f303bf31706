pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod schema;
pub mod user_repository;

pub use manager::DatabaseError;
pub use repository::{Entity, Repository};
pub use user_repository::UserRepository;
