//! Authentication service.
//!
//! Provides username/password registration and login. Argon2id hashing and
//! verification run on the blocking thread pool.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use rablo_core::{Email, Username};

use crate::db::{RepositoryError, UserStore};
use crate::models::user::User;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration and password login.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new user with username, email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is blank or malformed.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is already registered.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password.to_owned()).await?;

        self.users
            .create_with_password(&username, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.to_owned(), password_hash).await?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a hash.
async fn verify_password(password: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;

    #[test]
    fn short_password_is_weak() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .register("ada", "ada@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(user.username.as_str(), "ada");

        let logged_in = auth.login("ada", "correct horse").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let store = MemoryUserStore::new();
        AuthService::new(&store)
            .register("ada", "ada@example.com", "correct horse")
            .await
            .unwrap();

        let (_, hash) = store
            .get_password_hash(&Username::parse("ada").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);
        auth.register("ada", "ada@example.com", "correct horse")
            .await
            .unwrap();

        assert!(matches!(
            auth.login("ada", "wrong horse").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("grace", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);
        auth.register("ada", "ada@example.com", "correct horse")
            .await
            .unwrap();

        let err = auth
            .register("ada", "other@example.com", "another password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));

        // original password still works
        auth.login("ada", "correct horse").await.unwrap();
    }

    #[tokio::test]
    async fn invalid_fields_are_reported_in_order() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);

        assert!(matches!(
            auth.register(" ", "bad", "x").await,
            Err(AuthError::InvalidUsername(_))
        ));
        assert!(matches!(
            auth.register("ada", "bad", "x").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register("ada", "ada@example.com", "x").await,
            Err(AuthError::WeakPassword(_))
        ));
    }
}
