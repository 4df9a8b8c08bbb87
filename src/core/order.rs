//! Order business logic - Checkout and order administration.
//!
//! Customers place orders without logging in; the storefront sends the cart and
//! the total it computed. The total is stored as given and is never recomputed
//! from catalog prices. Admins list orders and move them through free-text states.

use crate::{
    core::product::required_text,
    entities::{
        Order,
        order::{self, DEFAULT_STATUS, OrderLine, OrderLines},
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Checkout payload from the storefront.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderInput {
    /// Required
    pub customer_name: Option<String>,
    /// Required
    pub customer_phone: Option<String>,
    /// Delivery address
    pub customer_address: Option<String>,
    /// Cart lines, required and non-empty
    pub products: Option<Vec<OrderLine>>,
    /// Total computed by the storefront, required
    pub total_price: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Admin status change. `notes` is kept when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdate {
    /// New status label, required
    pub status: Option<String>,
    /// Replacement notes
    pub notes: Option<String>,
}

/// Records a new order with status `"new"`.
///
/// Required fields are checked in the order `customer_name`, `customer_phone`,
/// products, `total_price`; an empty cart counts as missing. Nothing is written
/// when validation fails.
///
/// # Errors
/// Returns an error if a required field is missing, the total is not a finite
/// number, or the insert fails.
#[instrument(skip(db, input))]
pub async fn create_order(db: &DatabaseConnection, input: OrderInput) -> Result<order::Model> {
    let customer_name = required_text(input.customer_name, "customer_name")?;
    let customer_phone = required_text(input.customer_phone, "customer_phone")?;
    let products = match input.products {
        Some(lines) if !lines.is_empty() => OrderLines(lines),
        _ => return Err(Error::MissingField { field: "products" }),
    };
    let total_price = input.total_price.ok_or(Error::MissingField {
        field: "total_price",
    })?;
    // Client-computed; only reject values JSON numbers cannot round-trip.
    if !total_price.is_finite() {
        return Err(Error::InvalidField {
            field: "total_price",
            reason: "must be a finite number".to_string(),
        });
    }

    let order = order::ActiveModel {
        customer_name: Set(customer_name),
        customer_phone: Set(customer_phone),
        customer_address: Set(input.customer_address.unwrap_or_default()),
        products: Set(products),
        total_price: Set(total_price),
        status: Set(DEFAULT_STATUS.to_string()),
        notes: Set(input.notes.unwrap_or_default()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = order.insert(db).await?;
    info!(
        "New order {} from '{}' ({} lines, total {})",
        created.id,
        created.customer_name,
        created.products.0.len(),
        created.total_price
    );
    Ok(created)
}

/// Retrieves all orders, newest first.
pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<order::Model>> {
    Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific order by its unique ID.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Sets the status (and optionally the notes) of an order.
///
/// Any status label is accepted.
///
/// # Errors
/// Returns an error if:
/// - The order does not exist
/// - `status` is absent
/// - The database update operation fails
#[instrument(skip(db, update))]
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    update: StatusUpdate,
) -> Result<order::Model> {
    let mut order: order::ActiveModel = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?
        .into();

    let status = update.status.ok_or(Error::MissingStatus)?;
    order.status = Set(status);
    if let Some(notes) = update.notes {
        order.notes = Set(notes);
    }

    let updated = order.update(db).await?;
    info!("Order {} is now '{}'", updated.id, updated.status);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::product;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_order_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = sample_order_input();
        input.customer_name = Some(String::new());
        assert!(matches!(
            create_order(&db, input).await.unwrap_err(),
            Error::MissingField {
                field: "customer_name"
            }
        ));

        let mut input = sample_order_input();
        input.products = Some(Vec::new());
        assert!(matches!(
            create_order(&db, input).await.unwrap_err(),
            Error::MissingField { field: "products" }
        ));

        let mut input = sample_order_input();
        input.total_price = None;
        assert!(matches!(
            create_order(&db, input).await.unwrap_err(),
            Error::MissingField {
                field: "total_price"
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_details_are_stored_as_sent() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = sample_order_input();
        input.customer_name = Some(" Layla ".to_string());
        input.customer_phone = Some("+966 50 000 0000 ".to_string());
        let created = create_order(&db, input).await?;

        let stored = get_order_by_id(&db, created.id).await?.unwrap();
        assert_eq!(stored.customer_name, " Layla ");
        assert_eq!(stored.customer_phone, "+966 50 000 0000 ");

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_validation_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = sample_order_input();
        input.total_price = None;
        assert!(create_order(&db, input).await.is_err());

        assert_eq!(Order::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = sample_order_input();
        input.customer_address = None;
        input.notes = None;
        let created = create_order(&db, input).await?;

        assert_eq!(created.status, "new");
        assert_eq!(created.customer_address, "");
        assert_eq!(created.notes, "");
        assert_eq!(created.total_price, 140.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_snapshot_round_trips_unknown_keys() -> Result<()> {
        let db = setup_test_db().await?;
        let lines: Vec<OrderLine> = serde_json::from_value(json!([
            {"id": 7, "name": "Rose Oud", "size": "50ml", "price": 50, "quantity": 2,
             "gift_wrap": true, "engraving": {"text": "لك"}}
        ]))
        .unwrap();

        let mut input = sample_order_input();
        input.products = Some(lines.clone());
        let created = create_order(&db, input).await?;

        let stored = get_order_by_id(&db, created.id).await?.unwrap();
        assert_eq!(stored.products.0, lines);
        assert_eq!(
            serde_json::to_value(&stored.products).unwrap(),
            json!([{"id": 7, "name": "Rose Oud", "size": "50ml", "price": 50, "quantity": 2,
                    "gift_wrap": true, "engraving": {"text": "لك"}}])
        );
        assert_eq!(stored.products.0[0].quantity(), Some(2.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_lines_of_any_shape_are_stored_verbatim() -> Result<()> {
        let db = setup_test_db().await?;
        let cart = json!([
            {"id": "7", "name": "Rose Oud"},
            {"quantity": 1.5},
            {"price": "50"},
            "Rose Oud x2",
            null
        ]);

        let mut input = sample_order_input();
        input.products = Some(serde_json::from_value(cart.clone()).unwrap());
        let created = create_order(&db, input).await?;

        let stored = get_order_by_id(&db, created.id).await?.unwrap();
        assert_eq!(serde_json::to_value(&stored.products).unwrap(), cart);
        assert_eq!(stored.products.0[0].name(), Some("Rose Oud"));
        assert_eq!(stored.products.0[2].price(), None);
        assert_eq!(stored.products.0[3].name(), None);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_order(&db, sample_order_input()).await?;
        let second = create_order(&db, sample_order_input()).await?;
        let third = create_order(&db, sample_order_input()).await?;

        let ids: Vec<i64> = list_orders(&db).await?.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status_keeps_notes_when_omitted() -> Result<()> {
        let db = setup_test_db().await?;
        let mut input = sample_order_input();
        input.notes = Some("Call before delivery".to_string());
        let created = create_order(&db, input).await?;

        let updated = update_order_status(
            &db,
            created.id,
            StatusUpdate {
                status: Some("shipped".to_string()),
                notes: None,
            },
        )
        .await?;
        assert_eq!(updated.status, "shipped");
        assert_eq!(updated.notes, "Call before delivery");

        let updated = update_order_status(
            &db,
            created.id,
            StatusUpdate {
                status: Some("any label at all".to_string()),
                notes: Some("Delivered to neighbour".to_string()),
            },
        )
        .await?;
        assert_eq!(updated.status, "any label at all");
        assert_eq!(updated.notes, "Delivered to neighbour");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status_errors() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_order(&db, sample_order_input()).await?;

        let result = update_order_status(&db, created.id, StatusUpdate::default()).await;
        assert!(matches!(result.unwrap_err(), Error::MissingStatus));

        let result = update_order_status(
            &db,
            999,
            StatusUpdate {
                status: Some("shipped".to_string()),
                notes: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::OrderNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_order_survives_product_deletion() -> Result<()> {
        let db = setup_test_db().await?;
        let perfume = create_test_product(&db, "Rose Oud", "oud").await?;

        let mut input = sample_order_input();
        input.products = Some(vec![OrderLine::from(json!({
            "id": perfume.id,
            "name": perfume.name,
            "size": "100ml",
            "price": perfume.price_100ml,
            "quantity": 1
        }))]);
        let order = create_order(&db, input).await?;

        product::delete_product(&db, perfume.id).await?;

        let stored = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(stored, order);
        assert_eq!(stored.products.0[0].name(), Some("Rose Oud"));

        Ok(())
    }
}
