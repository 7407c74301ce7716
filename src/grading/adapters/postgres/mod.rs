//! `PostgreSQL` adapters for grading persistence.

mod models;
mod repository;
mod schema;

pub use repository::{GradingPgPool, PostgresGradingStore};
