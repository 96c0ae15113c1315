/// Order persistence behind the `OrderRepository` trait
///
/// - `PgOrderRepository`: PostgreSQL through the shared connection pool
/// - `InMemoryOrderRepository`: process-local storage, no database needed

pub mod in_memory_repository;
pub mod order_repository;

pub use in_memory_repository::InMemoryOrderRepository;
pub use order_repository::{OrderRepository, PgOrderRepository};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision PostgreSQL stores (microseconds), so a
/// created order compares equal to the same order read back later
pub(crate) fn creation_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
