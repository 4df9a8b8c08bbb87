//! User entity - Admin accounts allowed to manage the catalog and orders.
//!
//! Only the seeded admin exists in practice; there is no registration endpoint.
//! Passwords are stored as bcrypt hashes, never in plain text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name
    #[sea_orm(unique)]
    pub username: String,
    /// Salted one-way hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role label, `"admin"` for the seeded account
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
