//! Database configuration module.
//!
//! Picks the storage backend from the environment and creates the tables from the
//! entity definitions. Two backends are supported behind the same
//! `DatabaseConnection`: an embedded `SQLite` file (default) and a networked
//! `MySQL` server configured through `DB_*` variables. When the networked
//! configuration is incomplete the server runs without a database: list
//! endpoints answer with empty results and writes fail.

use crate::entities::{Order, Product, User};
use crate::errors::{Error, Result};
use sea_orm::sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, SqlxMySqlConnector};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default embedded database file
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/rawaj_store.sqlite?mode=rwc";

/// Default `MySQL` port when `DB_PORT` is not set
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Connection settings for the networked backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlSettings {
    /// Server hostname (`DB_HOST`)
    pub host: String,
    /// Login user (`DB_USER`)
    pub user: String,
    /// Login password (`DB_PASSWORD`)
    pub password: String,
    /// Schema name (`DB_NAME`)
    pub database: String,
    /// TCP port (`DB_PORT`, default 3306)
    pub port: u16,
    /// Require TLS (`DB_SSL`)
    pub ssl: bool,
}

/// Where the data lives, as resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Any URL `sea_orm::Database::connect` understands
    Url(String),
    /// Networked server built from `DB_*` variables
    MySql(MySqlSettings),
    /// Required configuration is missing; run degraded
    Unavailable {
        /// Which setting was missing
        reason: String,
    },
}

/// Resolves the database target from the process environment.
#[must_use]
pub fn database_target_from_env() -> DatabaseTarget {
    resolve_database_target(|key| std::env::var(key).ok())
}

/// Resolves the database target using `lookup` for variable access.
///
/// `DATABASE_URL` wins. Otherwise, if any of `DB_HOST`, `DB_USER`, `DB_PASSWORD`
/// or `DB_NAME` is set, all four are required. With none of them set the
/// embedded file at [`DEFAULT_DATABASE_URL`] is used.
pub fn resolve_database_target<F>(lookup: F) -> DatabaseTarget
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = get("DATABASE_URL") {
        return DatabaseTarget::Url(url);
    }

    let required = ["DB_HOST", "DB_USER", "DB_PASSWORD", "DB_NAME"];
    if required.iter().all(|key| get(key).is_none()) {
        return DatabaseTarget::Url(DEFAULT_DATABASE_URL.to_string());
    }

    let mut values = Vec::with_capacity(required.len());
    for key in required {
        match get(key) {
            Some(value) => values.push(value),
            None => {
                return DatabaseTarget::Unavailable {
                    reason: format!("{key} is not set"),
                };
            }
        }
    }

    let port = match get("DB_PORT") {
        None => DEFAULT_MYSQL_PORT,
        Some(raw) => match raw.trim().parse() {
            Ok(port) => port,
            Err(e) => {
                return DatabaseTarget::Unavailable {
                    reason: format!("DB_PORT is invalid: {e}"),
                };
            }
        },
    };

    let ssl = get("DB_SSL").is_some_and(|raw| {
        matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
    });

    let [host, user, password, database]: [String; 4] = match values.try_into() {
        Ok(values) => values,
        Err(_) => {
            return DatabaseTarget::Unavailable {
                reason: "incomplete DB_* configuration".to_string(),
            };
        }
    };

    DatabaseTarget::MySql(MySqlSettings {
        host,
        user,
        password,
        database,
        port,
        ssl,
    })
}

/// Opens a connection for the given target.
///
/// Returns `Ok(None)` for [`DatabaseTarget::Unavailable`]. For `SQLite` files the
/// parent directory is created first.
pub async fn create_connection(target: &DatabaseTarget) -> Result<Option<DatabaseConnection>> {
    match target {
        DatabaseTarget::Url(url) => {
            ensure_sqlite_parent_dir(url)?;
            debug!("Connecting to database at {url}");
            Ok(Some(Database::connect(url.as_str()).await?))
        }
        DatabaseTarget::MySql(settings) => {
            debug!(
                "Connecting to MySQL at {}:{}/{}",
                settings.host, settings.port, settings.database
            );
            let options = MySqlConnectOptions::new()
                .host(&settings.host)
                .port(settings.port)
                .username(&settings.user)
                .password(&settings.password)
                .database(&settings.database)
                .ssl_mode(if settings.ssl {
                    MySqlSslMode::Required
                } else {
                    MySqlSslMode::Preferred
                });
            let pool = MySqlPoolOptions::new()
                .max_connections(10)
                .connect_with(options)
                .await
                .map_err(|e| Error::BackendUnavailable {
                    message: format!("Failed to connect to MySQL: {e}"),
                })?;
            Ok(Some(SqlxMySqlConnector::from_sqlx_mysql_pool(pool)))
        }
        DatabaseTarget::Unavailable { reason } => {
            warn!("Database disabled: {reason}. Writes will fail and lists will be empty.");
            Ok(None)
        }
    }
}

fn ensure_sqlite_parent_dir(url: &str) -> Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Creates the `users`, `products` and `orders` tables if they do not exist.
///
/// The statements are generated from the entity definitions, so the schema always
/// matches the Rust models. Safe to run on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut product_table = schema.create_table_from_entity(Product);
    let mut order_table = schema.create_table_from_entity(Order);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(product_table.if_not_exists())).await?;
    db.execute(builder.build(order_table.if_not_exists())).await?;

    info!("Database tables ensured.");
    Ok(())
}
