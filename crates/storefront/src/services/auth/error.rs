//! Authentication error types.

use thiserror::Error;

use rablo_core::{EmailError, UsernameError};

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message shown to the user in a flash, if this error is the user's to fix.
    ///
    /// Returns `None` for server-side failures.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::InvalidUsername(e) => Some(capitalize(&e.to_string())),
            Self::InvalidEmail(e) => Some(capitalize(&e.to_string())),
            Self::WeakPassword(msg) => Some(capitalize(msg)),
            Self::InvalidCredentials => Some("Password or username is incorrect".to_owned()),
            Self::UserAlreadyExists => {
                Some("A user with the given username is already registered".to_owned())
            }
            Self::Repository(_) | Self::PasswordHash => None,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
