//! Order-fulfillment core for the storefront service.
//!
//! This crate provides:
//! - `CatalogStore`: products and live stock levels
//! - `OrderLedger`: append-only record of created orders
//! - `FulfillmentEngine`: validates a purchase, decrements stock and records
//!   the order as one serialized step
//! - Catalog seeding from JSON

pub mod error;
pub mod fulfillment;
pub mod ledger;
pub mod money;
pub mod order;
pub mod product;
pub mod seed;
pub mod store;

pub use common::{OrderId, ProductId};
pub use error::{FulfillmentError, Result, SeedError};
pub use fulfillment::{FulfillmentEngine, PlaceOrder};
pub use ledger::{InMemoryOrderLedger, OrderLedger};
pub use money::Money;
pub use order::{Order, OrderIdGenerator};
pub use product::Product;
pub use seed::{default_products, load_catalog, load_products, parse_products};
pub use store::CatalogStore;
