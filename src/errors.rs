//! Unified error type for the store backend.
//!
//! Every request either succeeds or fails with exactly one of these variants.
//! The HTTP layer renders them as `{"error": "<message>"}` with a status code
//! chosen by category.

use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// All failures the backend can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure (uploads, static assets)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required request field is absent or blank
    #[error("Missing field: {field}")]
    MissingField {
        /// Name of the first missing field
        field: &'static str,
    },

    /// A request field is present but unusable (e.g. a negative price)
    #[error("Invalid field: {field} ({reason})")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The request body could not be decoded
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Decoder message
        message: String,
    },

    /// Unknown product id
    #[error("Product not found")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// Unknown order id
    #[error("Order not found")]
    OrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// Order status update without a `status` value
    #[error("Missing status field")]
    MissingStatus,

    /// Protected operation without an active admin session
    #[error("Unauthorized")]
    Unauthorized,

    /// Login attempt without username or password
    #[error("Missing credentials")]
    MissingCredentials,

    /// Username/password mismatch
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Upload request without an `image` part
    #[error("No file uploaded")]
    NoFile,

    /// Upload request whose `image` part has no filename
    #[error("No file name")]
    NoFileName,

    /// The multipart body could not be read (malformed, or over the size limit)
    #[error("Upload failed: {0}")]
    Multipart(#[from] MultipartError),

    /// No usable database configuration, or the database cannot be reached
    #[error("Backend unavailable: {message}")]
    BackendUnavailable {
        /// Why the backend is unavailable
        message: String,
    },

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

impl Error {
    /// HTTP status communicating the error category.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::MalformedPayload { .. }
            | Self::MissingStatus
            | Self::MissingCredentials
            | Self::NoFile
            | Self::NoFileName => StatusCode::BAD_REQUEST,
            Self::ProductNotFound { .. } | Self::OrderNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Multipart(e) => e.status(),
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::BackendUnavailable { .. }
            | Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedPayload {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        } else {
            tracing::debug!("Request rejected ({status}): {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
