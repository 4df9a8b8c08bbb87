//! Product entity - A perfume in the catalog.
//!
//! Each product is sold in exactly two sizes (50ml and 100ml) with its own price
//! per size. The feature list is kept as a JSON column and round-trips as an
//! ordered list of strings.

use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Ordered list of free-text selling points shown on the storefront.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Features(pub Vec<String>);

impl From<Vec<String>> for Features {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Rose Oud")
    pub name: String,
    /// Localized display name
    pub arabic_name: String,
    /// Free-text category label (e.g., "oud", "floral")
    pub category: String,
    /// Long description, empty when not provided
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Price of the 50ml bottle
    pub price_50ml: f64,
    /// Price of the 100ml bottle
    pub price_100ml: f64,
    /// Relative URL of the product image, empty when not provided
    pub image_url: String,
    /// Selling points in display order
    #[sea_orm(column_type = "Json")]
    pub features: Features,
    /// When the product was created
    pub created_at: DateTimeUtc,
}

/// `Product` has no relationships; orders keep their own snapshot of cart lines
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
