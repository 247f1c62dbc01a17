//! Account management command.
//!
//! # Usage
//!
//! ```bash
//! CATALOG_USER_PASSWORD='…' rablo-cli user create -u ada -e ada@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `CATALOG_USER_PASSWORD` - Password for the new account

use rablo_storefront::db::PgUserStore;
use rablo_storefront::services::auth::AuthService;
use secrecy::{ExposeSecret, SecretString};

use super::{CommandError, connect};

const PASSWORD_VAR: &str = "CATALOG_USER_PASSWORD";

/// Create a new account.
///
/// Returns the ID of the created user.
///
/// # Errors
///
/// Returns an error if the password variable is missing, the input is
/// invalid, or the username is taken.
pub async fn create(username: &str, email: &str) -> Result<i32, CommandError> {
    dotenvy::dotenv().ok();

    let password = std::env::var(PASSWORD_VAR)
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(PASSWORD_VAR))?;

    let users = PgUserStore::new(connect().await?);

    tracing::info!("Creating account: {username}");
    let user = AuthService::new(&users)
        .register(username, email, password.expose_secret())
        .await?;

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}, Email: {}",
        user.id,
        user.username,
        user.email
    );

    Ok(user.id.as_i32())
}
