//! Session middleware configuration.
//!
//! Sessions use tower-sessions with a signed cookie. The store is chosen by the
//! caller: `PostgresStore` in production, `MemoryStore` for local runs and tests.

use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::CatalogConfig;
use crate::models::session::SESSION_LIFETIME_DAYS;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "rablo_session";

/// Create the session layer over `store`.
///
/// # Arguments
///
/// * `store` - Backing session store
/// * `config` - Catalog configuration (for the signing key and HTTPS detection)
#[must_use]
pub fn create_session_layer<S>(
    store: S,
    config: &CatalogConfig,
) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_LIFETIME_DAYS)))
        .with_secure(config.uses_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(config.session_key())
}
