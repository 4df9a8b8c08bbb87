//! Product business logic - Handles all catalog operations.
//!
//! This module provides functions for listing, creating, updating, and deleting
//! perfumes. Request payloads arrive as [`ProductInput`] with every field optional;
//! creation checks that the required fields are present, updates keep whatever
//! the payload leaves out. All functions are async and return Result types.

use crate::{
    entities::{
        Product,
        product::{self, Features},
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Product fields as sent by the admin UI. Absent and `null` are the same thing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    /// Display name, required on create
    pub name: Option<String>,
    /// Localized name, required on create
    pub arabic_name: Option<String>,
    /// Category label, required on create
    pub category: Option<String>,
    /// Long description
    pub description: Option<String>,
    /// Price of the 50ml bottle, required on create
    pub price_50ml: Option<f64>,
    /// Price of the 100ml bottle, required on create
    pub price_100ml: Option<f64>,
    /// Image URL, usually one returned by the upload endpoint
    pub image_url: Option<String>,
    /// Selling points in display order
    pub features: Option<Vec<String>>,
}

/// Returns a required text field as sent, or the missing-field error when it is
/// absent or blank.
pub(crate) fn required_text(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(Error::MissingField { field }),
    }
}

/// Rejects prices that are negative or not finite.
fn checked_price(price: f64, field: &'static str) -> Result<f64> {
    if !price.is_finite() {
        return Err(Error::InvalidField {
            field,
            reason: "must be a finite number".to_string(),
        });
    }
    if price < 0.0 {
        return Err(Error::InvalidField {
            field,
            reason: "cannot be negative".to_string(),
        });
    }
    Ok(price)
}

/// Rejects a text field that was sent but is blank.
fn non_blank(value: String, field: &'static str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::MissingField { field });
    }
    Ok(value)
}

/// Retrieves every product, grouped by category and then in insertion order.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Category)
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product, performing input validation.
///
/// Required fields are checked in the order name, `arabic_name`, category,
/// `price_50ml`, `price_100ml`; the first one missing is reported. Description,
/// image and features default to empty.
///
/// # Errors
/// Returns an error if:
/// - A required field is absent or blank
/// - A price is negative or not finite
/// - The database insert operation fails
#[instrument(skip(db, input))]
pub async fn create_product(db: &DatabaseConnection, input: ProductInput) -> Result<product::Model> {
    let name = required_text(input.name, "name")?;
    let arabic_name = required_text(input.arabic_name, "arabic_name")?;
    let category = required_text(input.category, "category")?;
    let price_50ml = checked_price(
        input.price_50ml.ok_or(Error::MissingField { field: "price_50ml" })?,
        "price_50ml",
    )?;
    let price_100ml = checked_price(
        input.price_100ml.ok_or(Error::MissingField {
            field: "price_100ml",
        })?,
        "price_100ml",
    )?;

    let product = product::ActiveModel {
        name: Set(name),
        arabic_name: Set(arabic_name),
        category: Set(category),
        description: Set(input.description.unwrap_or_default()),
        price_50ml: Set(price_50ml),
        price_100ml: Set(price_100ml),
        image_url: Set(input.image_url.unwrap_or_default()),
        features: Set(Features(input.features.unwrap_or_default())),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = product.insert(db).await?;
    info!("Added product '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Applies a partial update to an existing product.
///
/// Every field absent from `changes` keeps its stored value. Fields that are sent
/// are validated like on creation.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist
/// - A sent text field is blank or a sent price is invalid
/// - The database update operation fails
#[instrument(skip(db, changes))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    changes: ProductInput,
) -> Result<product::Model> {
    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if let Some(name) = changes.name {
        product.name = Set(non_blank(name, "name")?);
    }
    if let Some(arabic_name) = changes.arabic_name {
        product.arabic_name = Set(non_blank(arabic_name, "arabic_name")?);
    }
    if let Some(category) = changes.category {
        product.category = Set(non_blank(category, "category")?);
    }
    if let Some(description) = changes.description {
        product.description = Set(description);
    }
    if let Some(price) = changes.price_50ml {
        product.price_50ml = Set(checked_price(price, "price_50ml")?);
    }
    if let Some(price) = changes.price_100ml {
        product.price_100ml = Set(checked_price(price, "price_100ml")?);
    }
    if let Some(image_url) = changes.image_url {
        product.image_url = Set(image_url);
    }
    if let Some(features) = changes.features {
        product.features = Set(Features(features));
    }

    let updated = product.update(db).await?;
    debug!("Updated product {}", updated.id);
    Ok(updated)
}

/// Permanently removes a product.
///
/// Past orders are unaffected because they carry their own cart snapshot.
///
/// # Errors
/// Returns an error if the product does not exist or the delete fails.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let result = Product::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id: product_id });
    }
    info!("Deleted product {product_id}");
    Ok(())
}
