//! Persistence for the catalog.
//!
//! # Database: `rablo`
//!
//! ## Tables (schema `catalog`)
//!
//! - `product` - Catalog entries
//! - `account` - Local user accounts
//! - `account_password` - Argon2id password hashes
//!
//! Sessions live in the `tower_sessions.session` table managed by
//! `tower-sessions-sqlx-store`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p rablo-cli -- migrate
//! ```
//!
//! # Stores
//!
//! Handlers only see the [`ProductStore`] and [`UserStore`] traits. The
//! `PostgreSQL` implementations live in [`products`] and [`users`]; the
//! in-process implementations in [`memory`] back local demos and tests.

pub mod memory;
pub mod products;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use rablo_core::{Email, ProductDraft, ProductId, Username};

use crate::models::product::Product;
use crate::models::user::User;

pub use memory::{MemoryProductStore, MemoryUserStore};
pub use products::PgProductStore;
pub use users::PgUserStore;

/// Migrations for the catalog schema, embedded at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Filter applied when listing products.
///
/// All conditions are combined with AND; the default value matches every product.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductQuery {
    /// Only products flagged as featured.
    pub featured_only: bool,
    /// Only products whose price is strictly below this amount.
    pub max_price: Option<Decimal>,
    /// Only products whose rating is at least this value.
    pub min_rating: Option<f64>,
}

impl ProductQuery {
    /// Matches every product.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches featured products.
    #[must_use]
    pub fn featured() -> Self {
        Self {
            featured_only: true,
            ..Self::default()
        }
    }

    /// Matches products cheaper than `max_price`.
    #[must_use]
    pub fn price_below(max_price: Decimal) -> Self {
        Self {
            max_price: Some(max_price),
            ..Self::default()
        }
    }

    /// Matches products rated `min_rating` or higher.
    #[must_use]
    pub fn rating_at_least(min_rating: f64) -> Self {
        Self {
            min_rating: Some(min_rating),
            ..Self::default()
        }
    }

    /// Whether `product` satisfies every condition of this query.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.featured_only && !product.featured {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price.amount() >= max
        {
            return false;
        }
        if let Some(min) = self.min_rating
            && product.rating.value() < min
        {
            return false;
        }
        true
    }
}

/// Product persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// List products matching `query` in creation order.
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError>;

    /// Fetch one product.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a new product with a freshly generated ID and creation time.
    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError>;

    /// Replace every editable field of a product.
    ///
    /// Returns `None` (and changes nothing) if the product does not exist.
    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Remove a product, returning the removed record.
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account together with its password hash.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken; the
    /// existing account is left untouched.
    async fn create_with_password(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    /// Fetch an account and its password hash by username.
    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
