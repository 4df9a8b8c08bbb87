//! Core business logic - framework-agnostic catalog, order, auth, session and upload operations.

/// Admin accounts, password hashing and credential checks
pub mod auth;
/// Checkout and order administration
pub mod order;
/// Catalog management
pub mod product;
/// Admin login sessions
pub mod session;
/// Product image storage
pub mod upload;
