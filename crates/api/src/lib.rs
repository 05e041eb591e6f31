//! HTTP API for the storefront catalog and order fulfillment.
//!
//! Exposes the product catalog and order creation over REST, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use catalog::{FulfillmentEngine, InMemoryOrderLedger, OrderLedger, SeedError};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::{AppState, ServiceInfo};

/// Registers the service routes with no policy layers attached.
pub fn create_router<L: OrderLedger + 'static>(state: Arc<AppState<L>>) -> Router {
    Router::new()
        .route("/", get(routes::service::describe::<L>))
        .route("/health", get(routes::service::health))
        .route("/api/products", get(routes::products::list::<L>))
        .route("/api/products/{id}", get(routes::products::get::<L>))
        .route(
            "/api/orders",
            get(routes::orders::list::<L>).post(routes::orders::create::<L>),
        )
        .route("/api/orders/{id}", get(routes::orders::get::<L>))
        .with_state(state)
}

/// Creates the full application: service routes, metrics, body limit, CORS
/// and request tracing.
pub fn create_app<L: OrderLedger + 'static>(
    state: Arc<AppState<L>>,
    metrics_handle: PrometheusHandle,
    config: &Config,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::service::metrics))
        .with_state(metrics_handle);

    create_router(state).merge(metrics_router).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(DefaultBodyLimit::max(config.max_request_bytes)),
    )
}

/// Creates the default application state: a catalog seeded per `config`
/// and an empty in-memory ledger.
pub fn create_default_state(
    config: &Config,
) -> Result<Arc<AppState<InMemoryOrderLedger>>, SeedError> {
    let catalog = catalog::load_catalog(config.seed_path.as_deref())?;
    let engine = FulfillmentEngine::new(catalog, InMemoryOrderLedger::new());
    Ok(AppState::new(engine, ServiceInfo::new(config.mode.clone())))
}
