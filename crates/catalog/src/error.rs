//! Catalog and fulfillment error types.

use std::path::PathBuf;

use common::ProductId;
use thiserror::Error;

/// Reasons an order request can be refused.
///
/// `UnknownProduct` and `InsufficientStock` are kept apart for logs and
/// metrics, but callers outside the core see both as "product unavailable"
/// (see [`FulfillmentError::is_product_unavailable`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FulfillmentError {
    /// Product id or quantity missing or malformed.
    #[error("Invalid payload")]
    InvalidPayload,

    /// No product with the requested id exists.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The product exists but has fewer units than requested.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The order total does not fit in a `Money` amount.
    #[error("Order total out of range for {0}")]
    TotalOutOfRange(ProductId),
}

impl FulfillmentError {
    /// Returns true for the failures reported externally as "product unavailable".
    pub fn is_product_unavailable(&self) -> bool {
        matches!(
            self,
            FulfillmentError::UnknownProduct(_)
                | FulfillmentError::InsufficientStock { .. }
                | FulfillmentError::TotalOutOfRange(_)
        )
    }

    /// Short label used for the `reason` metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            FulfillmentError::InvalidPayload => "invalid_payload",
            FulfillmentError::UnknownProduct(_) => "unknown_product",
            FulfillmentError::InsufficientStock { .. } => "insufficient_stock",
            FulfillmentError::TotalOutOfRange(_) => "total_out_of_range",
        }
    }
}

/// Errors raised while loading the initial catalog.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("Failed to read catalog seed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seed was not a valid product array.
    #[error("Malformed catalog seed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two seed entries share the same id.
    #[error("Duplicate product id in catalog seed: {0}")]
    DuplicateProduct(ProductId),

    /// A seed entry carries a negative price.
    #[error("Negative price for product {0}")]
    NegativePrice(ProductId),

    /// A seed entry's price is above `Money::MAX_UNIT_PRICE`.
    #[error("Price for product {0} is out of range")]
    PriceOutOfRange(ProductId),
}

/// Convenience type alias for fulfillment results.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
