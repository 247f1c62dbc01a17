//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use rablo_storefront::config::{self, ConfigError};
use rablo_storefront::db::{self, RepositoryError};
use rablo_storefront::services::auth::AuthError;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Account creation failed.
    #[error("Account error: {0}")]
    Auth(#[from] AuthError),

    /// Seed file could not be read.
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Seed file is not valid YAML.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Seed file contains invalid products.
    #[error("{0} invalid product(s) in seed file")]
    InvalidSeed(usize),
}

/// Load `.env` and connect to the catalog database.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = config::database_url_from_env()?;
    tracing::info!("Connecting to catalog database...");
    Ok(db::create_pool(&database_url).await?)
}
