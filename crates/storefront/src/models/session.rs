//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use rablo_core::{UserId, Username};

/// Sessions are valid for this many days after sign-in.
pub const SESSION_LIFETIME_DAYS: i64 = 7;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: Username,
    /// When the session was authenticated.
    pub signed_in_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Identity for a user who has just signed in.
    #[must_use]
    pub fn signed_in_now(id: UserId, username: Username) -> Self {
        Self {
            id,
            username,
            signed_in_at: Utc::now(),
        }
    }

    /// Whether the sign-in is older than [`SESSION_LIFETIME_DAYS`] at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.signed_in_at >= Duration::days(SESSION_LIFETIME_DAYS)
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the page to return to after login.
    pub const REDIRECT_TO: &str = "redirect_to";

    /// Key for pending flash messages.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user_signed_in_at(signed_in_at: DateTime<Utc>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            username: Username::parse("ada").unwrap(),
            signed_in_at,
        }
    }

    #[test]
    fn fresh_session_is_valid() {
        let user = CurrentUser::signed_in_now(UserId::new(1), Username::parse("ada").unwrap());
        assert!(!user.is_expired(Utc::now()));
    }

    #[test]
    fn session_expires_after_seven_days() {
        let now = Utc::now();
        assert!(!user_signed_in_at(now - Duration::days(6)).is_expired(now));
        assert!(user_signed_in_at(now - Duration::days(7)).is_expired(now));
        assert!(user_signed_in_at(now - Duration::days(30)).is_expired(now));
    }
}
