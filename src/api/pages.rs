//! Storefront and admin pages, uploaded images, and the health probe.

use super::AppState;
use crate::config::AppConfig;
use axum::{Json, Router, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;

/// Static routes: `/`, `/admin`, `/uploads/*`, and every other unmatched path
/// from the static directory.
pub fn frontend(config: &AppConfig) -> Router<AppState> {
    let static_dir = &config.storage.static_dir;
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/admin", ServeFile::new(static_dir.join("admin.html")))
        .nest_service("/uploads", ServeDir::new(&config.storage.upload_dir))
        .fallback_service(ServeDir::new(static_dir))
}

/// `GET /api/health` - database connectivity.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(db) = state.database.as_deref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "database": "not configured" })),
        );
    };

    match db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "connected" })),
        ),
        Err(e) => {
            warn!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "database": "unreachable", "error": e.to_string() })),
            )
        }
    }
}
