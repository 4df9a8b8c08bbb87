//! Order entity - A customer checkout.
//!
//! The cart is frozen into the `products` JSON column at checkout time. It is not
//! a foreign key, so later catalog edits or deletions never touch past orders.

use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order status assigned at checkout
pub const DEFAULT_STATUS: &str = "new";

/// One line of the cart exactly as the storefront submitted it.
///
/// Any JSON value is accepted and stored verbatim. The accessors read the
/// well-known keys when they are present with the expected type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLine(pub Value);

impl OrderLine {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key)
    }

    /// Product name at checkout time
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name")?.as_str()
    }

    /// Bottle size label (e.g., "50ml")
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.get("size")?.as_str()
    }

    /// Unit price at checkout time, when sent as a number
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.get("price")?.as_f64()
    }

    /// Number of bottles, when sent as a number
    #[must_use]
    pub fn quantity(&self) -> Option<f64> {
        self.get("quantity")?.as_f64()
    }
}

impl From<Value> for OrderLine {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Snapshot of the whole cart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct OrderLines(pub Vec<OrderLine>);

impl OrderLines {
    /// True when the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer's name
    pub customer_name: String,
    /// Customer's phone number
    pub customer_phone: String,
    /// Delivery address, empty when not provided
    #[sea_orm(column_type = "Text")]
    pub customer_address: String,
    /// Cart snapshot taken at checkout
    #[sea_orm(column_type = "Json")]
    pub products: OrderLines,
    /// Total as computed by the storefront
    pub total_price: f64,
    /// Free-text workflow label, `"new"` at checkout
    pub status: String,
    /// Admin notes, empty when not provided
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    /// When the order was placed
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
