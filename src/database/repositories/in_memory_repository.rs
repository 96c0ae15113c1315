use crate::database::connection::DatabaseError;
use crate::models::{NewOrder, Order};
use parking_lot::Mutex;

use super::creation_timestamp;
use super::order_repository::OrderRepository;

/// In-process OrderRepository backed by a vector
///
/// Ids start at 1 and increase by one per create. Once closed, every call
/// fails with `PoolClosed`, mirroring the PostgreSQL implementation.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    orders: Vec<Order>,
    last_id: i64,
    closed: bool,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.lock().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, new_order: NewOrder) -> Result<Order, DatabaseError> {
        new_order
            .check_invariants()
            .map_err(|reason| DatabaseError::InvalidOrder(reason.to_string()))?;

        let mut state = self.state.lock();
        if state.closed {
            return Err(DatabaseError::PoolClosed);
        }

        state.last_id += 1;
        let order = new_order.into_order(state.last_id, creation_timestamp());
        state.orders.push(order.clone());

        Ok(order)
    }

    async fn list(&self) -> Result<Vec<Order>, DatabaseError> {
        let state = self.state.lock();
        if state.closed {
            return Err(DatabaseError::PoolClosed);
        }

        let mut orders = state.orders.clone();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(orders)
    }

    async fn close(&self) -> Result<(), DatabaseError> {
        self.state.lock().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderType;
    use rust_decimal_macros::dec;

    fn new_order(symbol: &str) -> NewOrder {
        NewOrder::new(symbol.to_string(), dec!(100.25), 3, OrderType::Sell)
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryOrderRepository::new();

        let first = repo.create(new_order("AAPL")).await.unwrap();
        let second = repo.create(new_order("MSFT")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let repo = InMemoryOrderRepository::new();

        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = InMemoryOrderRepository::new();
        for symbol in ["AAPL", "MSFT", "GOOG"] {
            repo.create(new_order(symbol)).await.unwrap();
        }

        let orders = repo.list().await.unwrap();
        let symbols: Vec<&str> = orders.iter().map(|o| o.symbol.as_str()).collect();

        assert_eq!(symbols, vec!["GOOG", "MSFT", "AAPL"]);
        assert!(orders
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_order() {
        let repo = InMemoryOrderRepository::new();
        let mut order = new_order("AAPL");
        order.quantity = 0;

        let err = repo.create(order).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidOrder(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_closed_repository_fails() {
        let repo = InMemoryOrderRepository::new();
        repo.close().await.unwrap();

        assert!(matches!(
            repo.create(new_order("AAPL")).await,
            Err(DatabaseError::PoolClosed)
        ));
        assert!(matches!(repo.list().await, Err(DatabaseError::PoolClosed)));
    }
}
