//! `/api/products` handlers.

use super::{AppState, extract::{AdminSession, ApiJson}};
use crate::{
    core::product::{self, ProductInput},
    entities::ProductModel,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::warn;

/// `GET /api/products` - the whole catalog, empty when no database is configured.
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductModel>>> {
    let Some(db) = state.database.as_deref() else {
        warn!("Listing products without a database; returning an empty catalog");
        return Ok(Json(Vec::new()));
    };
    Ok(Json(product::list_products(db).await?))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductModel>> {
    product::get_product_by_id(state.db()?, id)
        .await?
        .map(Json)
        .ok_or(Error::ProductNotFound { id })
}

/// `POST /api/products` - admin only.
pub async fn create_product(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<Value>)> {
    let created = product::create_product(state.db()?, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": created.id, "message": "Product added successfully" })),
    ))
}

/// `PUT /api/products/{id}` - admin only, partial update.
pub async fn update_product(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(changes): ApiJson<ProductInput>,
) -> Result<Json<Value>> {
    product::update_product(state.db()?, id, changes).await?;
    Ok(Json(json!({ "message": "Product updated successfully" })))
}

/// `DELETE /api/products/{id}` - admin only.
pub async fn delete_product(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    product::delete_product(state.db()?, id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
