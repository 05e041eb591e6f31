//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::{FulfillmentError, SeedError};
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
///
/// Every variant renders as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(&'static str),
    /// Request body over the configured limit.
    PayloadTooLarge,
    /// Order creation refused by the fulfillment engine.
    Fulfillment(FulfillmentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large".to_string(),
            ),
            ApiError::Fulfillment(err) => fulfillment_error_to_response(&err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Unknown products and short stock share one message on purpose: clients
/// only learn that the product cannot be bought right now.
fn fulfillment_error_to_response(err: &FulfillmentError) -> (StatusCode, String) {
    let message = if err.is_product_unavailable() {
        "Product unavailable"
    } else {
        "Invalid payload"
    };
    (StatusCode::BAD_REQUEST, message.to_string())
}

impl From<FulfillmentError> for ApiError {
    fn from(err: FulfillmentError) -> Self {
        ApiError::Fulfillment(err)
    }
}

/// Failures that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The catalog could not be seeded.
    #[error("Catalog seeding failed: {0}")]
    Seed(#[from] SeedError),

    /// The Prometheus recorder could not be installed.
    #[error("Metrics recorder setup failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
