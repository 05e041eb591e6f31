//! Order creation and ledger read endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::{FulfillmentError, Order, OrderId, OrderLedger, PlaceOrder};
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub order: Order,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub success: bool,
    pub data: Vec<Order>,
}

/// POST /api/orders — buy `quantity` units of `productId`.
///
/// Bodies that are missing, not JSON, or carry wrongly typed fields are
/// reported the same way as missing fields.
#[tracing::instrument(skip(state, payload))]
pub async fn create<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    payload: Result<Json<PlaceOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let cmd = match payload {
        Ok(Json(cmd)) => cmd,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable order payload");
            return Err(FulfillmentError::InvalidPayload.into());
        }
    };

    let order = state.engine.create_order(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            success: true,
            order,
        }),
    ))
}

/// GET /api/orders — all orders in creation order.
#[tracing::instrument(skip(state))]
pub async fn list<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
) -> Json<OrderListResponse> {
    let data = state.engine.ledger().list().await;
    Json(OrderListResponse {
        success: true,
        data,
    })
}

/// GET /api/orders/{id} — a single order.
#[tracing::instrument(skip(state))]
pub async fn get<L: OrderLedger + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    state
        .engine
        .ledger()
        .get(&OrderId::from(id))
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Order not found"))
}
