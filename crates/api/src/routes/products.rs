//! Catalog read endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use catalog::{OrderLedger, Product, ProductId};
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<Product>,
}

/// GET /api/products — every product with its current stock.
#[tracing::instrument(skip(state))]
pub async fn list<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
) -> Json<ProductListResponse> {
    let data = state.engine.catalog().list_products().await;
    Json(ProductListResponse {
        success: true,
        data,
    })
}

/// GET /api/products/{id} — a single product.
#[tracing::instrument(skip(state))]
pub async fn get<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .engine
        .catalog()
        .get_product(&ProductId::new(id))
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Product not found"))
}
