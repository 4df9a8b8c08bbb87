//! `/api/orders` handlers.

use super::{AppState, extract::{AdminSession, ApiJson}};
use crate::{
    core::order::{self, OrderInput, StatusUpdate},
    entities::OrderModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::warn;

/// `POST /api/orders` - public checkout.
pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<(StatusCode, Json<Value>)> {
    let created = order::create_order(state.db()?, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": created.id, "message": "Order added successfully" })),
    ))
}

/// `GET /api/orders` - admin only, newest first.
pub async fn list_orders(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderModel>>> {
    let Some(db) = state.database.as_deref() else {
        warn!("Listing orders without a database; returning no orders");
        return Ok(Json(Vec::new()));
    };
    Ok(Json(order::list_orders(db).await?))
}

/// `PUT /api/orders/{id}` - admin only.
pub async fn update_order_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Value>> {
    order::update_order_status(state.db()?, id, update).await?;
    Ok(Json(json!({ "message": "Order status updated successfully" })))
}
