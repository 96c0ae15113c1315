/// Database module for PostgreSQL integration
///
/// This module provides:
/// - Connection pooling with an explicit close
/// - The order repository trait and its implementations
/// - Diesel schema and embedded migrations

pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod schema;

pub use connection::{establish_connection_pool, DatabaseError, DatabasePool};
pub use migrations::{has_pending_migrations, run_migrations};
