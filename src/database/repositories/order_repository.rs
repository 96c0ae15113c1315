use crate::database::connection::{DatabaseError, DatabasePool};
use crate::database::schema::orders;
use crate::models::{NewOrder, Order};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use super::creation_timestamp;

/// Order repository trait - the boundary between handlers and storage
///
/// Implementations must be safe to share across request tasks.
#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a validated order and return it with its assigned id and
    /// creation time
    async fn create(&self, new_order: NewOrder) -> Result<Order, DatabaseError>;

    /// All orders, newest first (empty vector when there are none)
    async fn list(&self) -> Result<Vec<Order>, DatabaseError>;

    /// Release the underlying storage resources
    async fn close(&self) -> Result<(), DatabaseError>;
}

/// PostgreSQL implementation of OrderRepository
///
/// Diesel is synchronous, so every statement runs on the blocking pool.
pub struct PgOrderRepository {
    pool: DatabasePool,
}

impl PgOrderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, DatabaseError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get_conn()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::TaskFailed(e.to_string()))?
    }
}

#[async_trait::async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, new_order: NewOrder) -> Result<Order, DatabaseError> {
        new_order
            .check_invariants()
            .map_err(|reason| DatabaseError::InvalidOrder(reason.to_string()))?;

        let created_at = creation_timestamp();

        self.run(move |conn| {
            let id = diesel::insert_into(orders::table)
                .values((
                    orders::symbol.eq(&new_order.symbol),
                    orders::price.eq(new_order.price),
                    orders::quantity.eq(new_order.quantity),
                    orders::order_type.eq(new_order.order_type),
                    orders::created_at.eq(created_at),
                ))
                .returning(orders::id)
                .get_result::<i64>(conn)?;

            Ok(new_order.into_order(id, created_at))
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Order>, DatabaseError> {
        self.run(|conn| {
            orders::table
                .select(Order::as_select())
                .order((orders::created_at.desc(), orders::id.desc()))
                .load::<Order>(conn)
                .map_err(DatabaseError::from)
        })
        .await
    }

    async fn close(&self) -> Result<(), DatabaseError> {
        self.pool.close();
        Ok(())
    }
}
