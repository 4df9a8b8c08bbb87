//! `POST /api/upload-image`

use super::AppState;
use crate::{
    core::upload,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde_json::{Value, json};

/// Form field holding the file
const IMAGE_FIELD: &str = "image";

/// Stores the `image` part of a multipart form and returns its URL.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    let mut multipart = multipart.map_err(|_| Error::NoFile)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.trim().is_empty() {
            return Err(Error::NoFileName);
        }

        let bytes = field.bytes().await?;
        let url = upload::store_image(&state.config.storage.upload_dir, &file_name, &bytes).await?;
        return Ok(Json(json!({ "url": url })));
    }

    Err(Error::NoFile)
}
