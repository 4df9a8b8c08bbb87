//! Admin accounts and credential checks.
//!
//! Passwords are kept as bcrypt hashes. Callers never compare password strings
//! themselves; they ask a [`PasswordHash`] whether a candidate matches.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Role given to the seeded account
pub const ADMIN_ROLE: &str = "admin";

/// A salted one-way password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes `password` with the given bcrypt cost.
    pub fn generate(password: &str, cost: u32) -> Result<Self> {
        Ok(Self(bcrypt::hash(password, cost)?))
    }

    /// Wraps an already-stored hash.
    #[must_use]
    pub const fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// Checks `candidate` against the hash. Malformed hashes never verify.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        bcrypt::verify(candidate, &self.0).unwrap_or(false)
    }

    /// The encoded hash, for storage
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Finds a user by login name.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts the admin account unless a user with that name already exists.
///
/// Returns `true` when a row was created. An existing account is left untouched,
/// including its password.
#[instrument(skip(db, password))]
pub async fn seed_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    cost: u32,
) -> Result<bool> {
    if get_user_by_username(db, username).await?.is_some() {
        debug!("Admin account '{username}' already exists. Skipping.");
        return Ok(false);
    }

    let hash = PasswordHash::generate(password, cost)?;
    user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash.as_str().to_string()),
        role: Set(ADMIN_ROLE.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Seeded admin account '{username}'");
    Ok(true)
}

/// Checks a username/password pair.
///
/// # Errors
/// Returns `Error::MissingCredentials` if either value is absent,
/// `Error::InvalidCredentials` if the user is unknown or the password does not
/// match, and a database error if the lookup fails.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<user::Model> {
    let (Some(username), Some(password)) = (username, password) else {
        return Err(Error::MissingCredentials);
    };

    let Some(account) = get_user_by_username(db, username).await? else {
        warn!("Login attempt for unknown user '{username}'");
        return Err(Error::InvalidCredentials);
    };

    if !PasswordHash::from_stored(account.password_hash.clone()).verify(password) {
        warn!("Wrong password for user '{username}'");
        return Err(Error::InvalidCredentials);
    }

    info!("User '{}' authenticated", account.username);
    Ok(account)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_password_hash_verify() {
        let hash = PasswordHash::generate("rawaj123", TEST_BCRYPT_COST).unwrap();
        assert!(hash.verify("rawaj123"));
        assert!(!hash.verify("rawaj124"));
        assert!(!hash.verify(""));
        assert_ne!(hash.as_str(), "rawaj123");
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = PasswordHash::generate("same", TEST_BCRYPT_COST).unwrap();
        let second = PasswordHash::generate("same", TEST_BCRYPT_COST).unwrap();
        assert_ne!(first, second);
        assert!(first.verify("same") && second.verify("same"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hash = PasswordHash::from_stored("plaintext".to_string());
        assert!(!hash.verify("plaintext"));
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(seed_admin(&db, "admin", "first", TEST_BCRYPT_COST).await?);
        assert!(!seed_admin(&db, "admin", "second", TEST_BCRYPT_COST).await?);

        let account = get_user_by_username(&db, "admin").await?.unwrap();
        assert_eq!(account.role, ADMIN_ROLE);
        assert!(PasswordHash::from_stored(account.password_hash).verify("first"));

        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate() -> Result<()> {
        let db = setup_test_db_with_admin().await?;

        let account = authenticate(&db, Some(TEST_ADMIN_USER), Some(TEST_ADMIN_PASSWORD)).await?;
        assert_eq!(account.username, TEST_ADMIN_USER);

        let result = authenticate(&db, Some(TEST_ADMIN_USER), Some("nope")).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidCredentials));

        let result = authenticate(&db, Some("ghost"), Some(TEST_ADMIN_PASSWORD)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidCredentials));

        let result = authenticate(&db, Some(TEST_ADMIN_USER), None).await;
        assert!(matches!(result.unwrap_err(), Error::MissingCredentials));

        Ok(())
    }
}
