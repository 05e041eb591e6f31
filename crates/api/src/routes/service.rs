//! Service descriptor, health and metrics endpoints.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use catalog::OrderLedger;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use super::AppState;

/// Protocol the client used to reach the service (`"http"` or `"https"`).
///
/// Taken from `X-Forwarded-Proto` when a proxy sets it, otherwise from the
/// request URI scheme, otherwise `"http"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Protocol {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty());

        let protocol = forwarded
            .or_else(|| parts.uri.scheme_str().map(str::to_ascii_lowercase))
            .unwrap_or_else(|| "http".to_string());

        Ok(Protocol(protocol))
    }
}

#[derive(Serialize)]
pub struct ServiceDescriptor {
    pub service: String,
    pub version: String,
    pub mode: String,
    pub protocol: String,
}

/// GET / — describes the running service.
pub async fn describe<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Protocol(protocol): Protocol,
) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: state.service.name.clone(),
        version: state.service.version.clone(),
        mode: state.service.mode.clone(),
        protocol,
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /metrics — Prometheus text exposition.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
