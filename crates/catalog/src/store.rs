//! In-memory catalog of products and their stock.

use std::collections::HashMap;
use std::sync::Arc;

use common::ProductId;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::error::{FulfillmentError, SeedError};
use crate::money::Money;
use crate::product::Product;

/// Products in seed order, plus an id index.
#[derive(Debug, Default)]
pub(crate) struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

/// Stock that passed the availability check but has not been taken yet.
///
/// Only meaningful while the write guard it was obtained under is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StockReservation {
    position: usize,
    quantity: u32,
    price: Money,
}

impl StockReservation {
    pub(crate) fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn price(&self) -> Money {
        self.price
    }
}

impl Catalog {
    fn from_products(products: Vec<Product>) -> Result<Self, SeedError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if product.price.is_negative() {
                return Err(SeedError::NegativePrice(product.id.clone()));
            }
            if product.price > Money::MAX_UNIT_PRICE {
                return Err(SeedError::PriceOutOfRange(product.id.clone()));
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(SeedError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products, index })
    }

    fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&position| &self.products[position])
    }

    /// Checks that `quantity` units of a product can be taken.
    ///
    /// Does not modify the catalog; the units are only taken by
    /// [`Catalog::commit`].
    pub(crate) fn reserve_stock(
        &self,
        id: &ProductId,
        quantity: u64,
    ) -> Result<StockReservation, FulfillmentError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| FulfillmentError::UnknownProduct(id.clone()))?;
        let product = &self.products[position];

        let insufficient = || FulfillmentError::InsufficientStock {
            product_id: id.clone(),
            requested: quantity,
            available: product.stock,
        };
        if !product.has_stock(quantity) {
            return Err(insufficient());
        }
        let quantity = u32::try_from(quantity).map_err(|_| insufficient())?;

        Ok(StockReservation {
            position,
            quantity,
            price: product.price,
        })
    }

    /// Takes the reserved units out of stock. Never fails and never panics
    /// for a reservation made under the same write guard.
    pub(crate) fn commit(&mut self, reservation: StockReservation) {
        let product = &mut self.products[reservation.position];
        product.stock = product.stock.saturating_sub(reservation.quantity);
    }
}

/// Shared handle to the product catalog.
///
/// Reads are available to anyone holding the handle. Stock only changes
/// through the fulfillment engine, which holds the write lock for the whole
/// check-and-take sequence.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<Catalog>>,
}

impl CatalogStore {
    /// Creates a catalog from seed products.
    ///
    /// Rejects duplicate ids, negative prices and prices above
    /// [`Money::MAX_UNIT_PRICE`].
    pub fn new(products: Vec<Product>) -> Result<Self, SeedError> {
        let catalog = Catalog::from_products(products)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(catalog)),
        })
    }

    /// Returns every product in stored order.
    pub async fn list_products(&self) -> Vec<Product> {
        self.inner.read().await.products.clone()
    }

    /// Returns the product with the given id, if any.
    pub async fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.inner.read().await.get(id).cloned()
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner.write().await
    }
}
