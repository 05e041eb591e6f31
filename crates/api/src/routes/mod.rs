//! HTTP route handlers.

pub mod orders;
pub mod products;
pub mod service;

use std::sync::Arc;

use catalog::{FulfillmentEngine, OrderLedger};

/// Static facts about the running service, reported by `GET /`.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub mode: String,
}

impl ServiceInfo {
    /// Name reported by the service descriptor.
    pub const NAME: &'static str = "Storefront E-Commerce API";

    /// Builds the descriptor for this build running in `mode`.
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            name: Self::NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            mode: mode.into(),
        }
    }
}

/// Shared application state accessible from all handlers.
pub struct AppState<L: OrderLedger> {
    pub engine: FulfillmentEngine<L>,
    pub service: ServiceInfo,
}

impl<L: OrderLedger> AppState<L> {
    pub fn new(engine: FulfillmentEngine<L>, service: ServiceInfo) -> Arc<Self> {
        Arc::new(Self { engine, service })
    }
}
