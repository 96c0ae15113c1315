// Library Crate Root
// lib.rs

// main.rs and bin/migrate.rs import through lib.rs like an external crate
pub mod api;
pub mod config;
pub mod database;
pub mod models;

// pub use = re-export at crate root
pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use database::repositories::{InMemoryOrderRepository, OrderRepository, PgOrderRepository};
pub use models::{NewOrder, Order, OrderRequest, OrderType};
