//! Authentication middleware and extractors.
//!
//! Provides the auth gate for mutating routes and helpers for signing users
//! in and out of the session.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use crate::error::INTERNAL_ERROR_BODY;
use crate::middleware::flash;
use crate::models::session::{CurrentUser, keys};

/// Flash shown when an anonymous visitor hits a guarded route.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in to do any action";

/// Extractor that requires an authenticated user.
///
/// If nobody is logged in, the requested page is remembered (GET requests
/// only), an error flash is queued and the visitor is redirected to `/login`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// The session layer is missing or the session store failed.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::SessionUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::SessionUnavailable)?;

        match current_user(&session).await {
            Ok(Some(user)) => return Ok(Self(user)),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to read session");
                return Err(AuthRejection::SessionUnavailable);
            }
        }

        if parts.method == Method::GET || parts.method == Method::HEAD {
            // Nested routers strip their prefix from `parts.uri`.
            let uri = parts
                .extensions
                .get::<OriginalUri>()
                .map_or(&parts.uri, |original| &original.0);
            let target = uri.path_and_query().map(|pq| pq.as_str());
            if let Some(target) = target.filter(|t| is_local_path(t))
                && let Err(e) = session.insert(keys::REDIRECT_TO, target).await
            {
                tracing::warn!(error = %e, "Failed to store redirect target");
            }
        }

        if let Err(e) = flash::error(&session, LOGIN_REQUIRED_MESSAGE).await {
            tracing::warn!(error = %e, "Failed to queue login flash");
        }

        Err(AuthRejection::RedirectToLogin)
    }
}

/// Read the signed-in user, ending the session if the sign-in has expired.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn current_user(
    session: &Session,
) -> Result<Option<CurrentUser>, tower_sessions::session::Error> {
    let Some(user) = session.get::<CurrentUser>(keys::CURRENT_USER).await? else {
        return Ok(None);
    };

    if user.is_expired(Utc::now()) {
        tracing::debug!(user_id = %user.id, "Session expired");
        session.flush().await?;
        return Ok(None);
    }

    Ok(Some(user))
}

/// Store `user` as the signed-in user under a fresh session ID.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_USER, user).await
}

/// Take the page remembered by the auth gate, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_redirect_target(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    let target = session.remove::<String>(keys::REDIRECT_TO).await?;
    Ok(target.filter(|t| is_local_path(t)))
}

/// End the session entirely (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Whether `target` is a path on this site (not an absolute or protocol-relative URL).
fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}
