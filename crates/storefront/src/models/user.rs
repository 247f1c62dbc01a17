//! User domain types.

use chrono::{DateTime, Utc};

use rablo_core::{Email, UserId, Username};

/// A local catalog account (domain type).
///
/// The password hash is never part of this type; it is only read by the
/// login path through `UserStore::get_password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique across accounts.
    pub username: Username,
    /// Contact address given at signup.
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
