//! Order records and order id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// An immutable record of a completed purchase.
///
/// `total` is frozen at creation time and is not affected by later price
/// changes. Fields are only readable; the ledger never hands out a mutable
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    product_id: ProductId,
    quantity: u32,
    total: Money,
    #[serde(with = "rfc3339_millis")]
    created_at: DateTime<Utc>,
}

impl Order {
    pub(crate) fn new(
        id: OrderId,
        product_id: ProductId,
        quantity: u32,
        total: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            total,
            created_at,
        }
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Hands out order ids that never repeat within a process.
///
/// The timestamp keeps ids readable; the sequence number makes two orders
/// created in the same millisecond distinct.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    sequence: AtomicU64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id, stamped with `at`.
    pub fn next(&self, at: DateTime<Utc>) -> OrderId {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        OrderId::from_parts(at.timestamp_millis(), sequence)
    }
}

mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
