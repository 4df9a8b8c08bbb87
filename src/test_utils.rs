//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    api::AppState,
    config::AppConfig,
    core::{
        auth,
        order::OrderInput,
        product::{self, ProductInput},
    },
    entities::{self, order::OrderLine},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

/// Lowest bcrypt work factor, keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;
/// Username of the admin seeded by [`setup_test_db_with_admin`]
pub const TEST_ADMIN_USER: &str = "admin";
/// Password of the admin seeded by [`setup_test_db_with_admin`]
pub const TEST_ADMIN_PASSWORD: &str = "correct horse";

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Same as [`setup_test_db`] with the test admin account seeded.
pub async fn setup_test_db_with_admin() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    auth::seed_admin(&db, TEST_ADMIN_USER, TEST_ADMIN_PASSWORD, TEST_BCRYPT_COST).await?;
    Ok(db)
}

/// Fresh, not yet created directory under the system temp dir.
#[must_use]
pub fn temp_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4().simple()))
}

/// Settings pointing uploads at a private temp directory.
#[must_use]
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.upload_dir = temp_dir("rawaj-uploads");
    config.storage.static_dir = temp_dir("rawaj-static");
    config.admin.username = TEST_ADMIN_USER.to_string();
    config.admin.bcrypt_cost = TEST_BCRYPT_COST;
    config
}

/// Handler state backed by a seeded in-memory database.
pub async fn setup_test_state() -> Result<AppState> {
    init_test_tracing();
    let db = setup_test_db_with_admin().await?;
    Ok(AppState::new(Some(db), Arc::new(test_config())))
}

/// Handler state with no database, as when configuration is missing.
#[must_use]
pub fn setup_degraded_state() -> AppState {
    AppState::new(None, Arc::new(test_config()))
}

/// The Rose Oud product used throughout the tests.
///
/// # Defaults
/// * description, `image_url`, features: absent
#[must_use]
pub fn rose_oud_input() -> ProductInput {
    ProductInput {
        name: Some("Rose Oud".to_string()),
        arabic_name: Some("روز عود".to_string()),
        category: Some("oud".to_string()),
        price_50ml: Some(50.0),
        price_100ml: Some(90.0),
        ..Default::default()
    }
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `arabic_name`: same as `name`
/// * prices: 40.0 / 70.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    category: &str,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductInput {
            name: Some(name.to_string()),
            arabic_name: Some(name.to_string()),
            category: Some(category.to_string()),
            price_50ml: Some(40.0),
            price_100ml: Some(70.0),
            ..Default::default()
        },
    )
    .await
}

/// A complete checkout: two bottles, total 140.
#[must_use]
pub fn sample_order_input() -> OrderInput {
    OrderInput {
        customer_name: Some("Layla".to_string()),
        customer_phone: Some("+966500000000".to_string()),
        customer_address: Some("Riyadh".to_string()),
        products: Some(vec![
            OrderLine::from(
                json!({ "id": 1, "name": "Rose Oud", "size": "50ml", "price": 50.0, "quantity": 1 }),
            ),
            OrderLine::from(
                json!({ "id": 1, "name": "Rose Oud", "size": "100ml", "price": 90.0, "quantity": 1 }),
            ),
        ]),
        total_price: Some(140.0),
        notes: Some(String::new()),
    }
}
