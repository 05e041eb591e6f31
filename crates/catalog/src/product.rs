//! Catalog product.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A product offered for sale and its live stock level.
///
/// Values handed out by the catalog are snapshots; changing one does not
/// affect the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Human-readable name, if the seed provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unit price.
    pub price: Money,

    /// Units available for sale.
    pub stock: u32,
}

impl Product {
    /// Creates a product without a display name.
    pub fn new(id: impl Into<ProductId>, price: Money, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: None,
            price,
            stock,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if at least `quantity` units are in stock.
    pub fn has_stock(&self, quantity: u64) -> bool {
        u64::from(self.stock) >= quantity
    }
}
