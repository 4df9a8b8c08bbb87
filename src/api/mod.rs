//! HTTP layer - routes, handlers, and the shared request state
//!
//! This module exposes the store over a JSON API with `axum`, serves the
//! storefront and admin pages, and carries the database handle and session store
//! to every handler through [`AppState`].

/// `/api/login`, `/api/logout`, `/api/check-auth`
pub mod auth;
/// Session and JSON extractors
pub mod extract;
/// `/api/orders`
pub mod orders;
/// Static pages and the health probe
pub mod pages;
/// `/api/products`
pub mod products;
/// `/api/upload-image`
pub mod upload;


use crate::{
    config::AppConfig,
    core::session::SessionStore,
    errors::{Error, Result},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA},
    },
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, instrument};

/// Shared data available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection, `None` when running without a usable configuration
    pub database: Option<Arc<DatabaseConnection>>,
    /// Admin sessions
    pub sessions: Arc<SessionStore>,
    /// Loaded settings
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Creates the state shared by all handlers.
    #[must_use]
    pub fn new(database: Option<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session.idle_timeout()));
        Self {
            database: database.map(Arc::new),
            sessions,
            config,
        }
    }

    /// The database connection, or `Error::BackendUnavailable` when there is none.
    pub fn db(&self) -> Result<&DatabaseConnection> {
        self.database.as_deref().ok_or_else(|| Error::BackendUnavailable {
            message: "database is not configured".to_string(),
        })
    }
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let api = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/orders/:id", put(orders::update_order_status))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/check-auth", get(auth::check_auth))
        .route("/upload-image", post(upload::upload_image))
        .route("/health", get(pages::health));

    let body_limit = match config.storage.max_upload_bytes {
        0 => DefaultBodyLimit::disable(),
        limit => DefaultBodyLimit::max(limit),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let mut app = Router::new()
        .nest("/api", api)
        .merge(pages::frontend(&config))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    if config.http.disable_cache {
        app = app
            .layer(SetResponseHeaderLayer::overriding(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                PRAGMA,
                HeaderValue::from_static("no-cache"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                EXPIRES,
                HeaderValue::from_static("0"),
            ));
    }

    app
}

/// Binds the configured address and serves until Ctrl+C or SIGTERM.
#[instrument(skip(state))]
pub async fn serve(state: AppState) -> Result<()> {
    let address = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = build_router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
