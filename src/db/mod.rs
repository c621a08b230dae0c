//! Database module
//!
//! PostgreSQL-backed document store using sqlx with:
//! - Connection pool management
//! - Row types with FromRow
//! - Repository functions for data access

pub mod models;
pub mod pool;
pub mod repository;
pub mod store;

// Re-export commonly used items
pub use pool::{create_pool, run_migrations};
pub use store::PgDocumentStore;
