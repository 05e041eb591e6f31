//! Order fulfillment: validate a purchase, take stock, record the order.

use chrono::{SubsecRound, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::error::{FulfillmentError, Result};
use crate::ledger::OrderLedger;
use crate::order::{Order, OrderIdGenerator};
use crate::store::CatalogStore;

/// Command to purchase a quantity of one product.
///
/// Fields are optional because they arrive straight from a client payload;
/// presence is checked by the engine.
///
/// `quantity` accepts any positive JSON integer. Values above `u64::MAX`
/// are clamped to it; they can never be in stock either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "whole_number::deserialize")]
    pub quantity: Option<u64>,
}

impl PlaceOrder {
    /// Creates a fully populated command.
    pub fn new(product_id: impl Into<ProductId>, quantity: u64) -> Self {
        Self {
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
        }
    }

    fn validate(self) -> Result<(ProductId, u64)> {
        match (self.product_id, self.quantity) {
            (Some(product_id), Some(quantity)) if !product_id.is_empty() && quantity > 0 => {
                Ok((product_id, quantity))
            }
            _ => Err(FulfillmentError::InvalidPayload),
        }
    }
}

/// Turns purchase requests into orders.
///
/// Owns the catalog and ledger handles. The catalog write lock is held from
/// the stock check until the stock is taken, so concurrent requests for the
/// same units cannot both succeed and the ledger order matches the order in
/// which ids were issued.
///
/// The ledger append is the only await inside the lock and comes before any
/// catalog change. Stock is taken in the same poll that sees the append
/// complete, so dropping a `create_order` future at any point leaves the
/// catalog and ledger consistent.
pub struct FulfillmentEngine<L: OrderLedger> {
    catalog: CatalogStore,
    ledger: L,
    ids: OrderIdGenerator,
}

impl<L: OrderLedger> FulfillmentEngine<L> {
    /// Creates an engine over the given catalog and ledger.
    pub fn new(catalog: CatalogStore, ledger: L) -> Self {
        Self {
            catalog,
            ledger,
            ids: OrderIdGenerator::new(),
        }
    }

    /// Returns the catalog this engine sells from.
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Returns the ledger this engine records into.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Validates and fulfills a purchase.
    ///
    /// On failure neither the catalog nor the ledger is modified.
    #[tracing::instrument(skip(self, cmd), fields(product_id = ?cmd.product_id, quantity = ?cmd.quantity))]
    pub async fn create_order(&self, cmd: PlaceOrder) -> Result<Order> {
        match self.fulfill(cmd).await {
            Ok(order) => {
                metrics::counter!("orders_created_total").increment(1);
                metrics::counter!("order_units_sold_total").increment(u64::from(order.quantity()));
                tracing::info!(order_id = %order.id(), total = %order.total(), "order created");
                Ok(order)
            }
            Err(err) => {
                metrics::counter!("orders_rejected_total", "reason" => err.reason()).increment(1);
                tracing::warn!(error = %err, "order rejected");
                Err(err)
            }
        }
    }

    async fn fulfill(&self, cmd: PlaceOrder) -> Result<Order> {
        let (product_id, quantity) = cmd.validate()?;

        let mut catalog = self.catalog.write().await;
        let reservation = catalog.reserve_stock(&product_id, quantity)?;
        let total = reservation
            .price()
            .checked_multiply(reservation.quantity())
            .ok_or_else(|| FulfillmentError::TotalOutOfRange(product_id.clone()))?;

        let created_at = Utc::now().trunc_subsecs(3);
        let order = Order::new(
            self.ids.next(created_at),
            product_id,
            reservation.quantity(),
            total,
            created_at,
        );

        let order = self.ledger.append(order).await;
        catalog.commit(reservation);
        drop(catalog);

        Ok(order)
    }
}

/// Reads an optional positive-or-zero JSON integer, clamping values too large
/// for `u64`. Fractions, negatives and non-numbers are rejected.
mod whole_number {
    use std::fmt;

    use serde::Deserializer;
    use serde::de::{self, Visitor};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WholeNumberVisitor)
    }

    struct WholeNumberVisitor;

    impl<'de> Visitor<'de> for WholeNumberVisitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            u64::try_from(value)
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
        }

        // serde_json hands integers beyond u64 over as floats.
        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
                Ok(Some(value as u64))
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }
}
