//! Append-only order ledger.

use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use tokio::sync::RwLock;

use crate::order::Order;

/// Storage for created orders.
///
/// Implementations must keep insertion order and must never modify or drop
/// an order once appended.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Adds an order to the end of the ledger and returns it.
    ///
    /// Must be cancel-safe: if the future is dropped before it completes,
    /// the order must not be recorded.
    async fn append(&self, order: Order) -> Order;

    /// Returns all orders in creation order.
    async fn list(&self) -> Vec<Order>;

    /// Looks up a single order by id.
    async fn get(&self, id: &OrderId) -> Option<Order>;

    /// Returns the number of orders recorded.
    async fn len(&self) -> usize;

    /// Returns true if no order has been recorded.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// In-memory ledger. Contents live for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderLedger {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderLedger for InMemoryOrderLedger {
    async fn append(&self, order: Order) -> Order {
        // The push happens in the poll that acquires the lock.
        self.orders.write().await.push(order.clone());
        order
    }

    async fn list(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    async fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders
            .read()
            .await
            .iter()
            .find(|order| order.id() == id)
            .cloned()
    }

    async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}
