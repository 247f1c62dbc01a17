//! One-shot flash messages carried in the session.
//!
//! A flash is queued by one request and rendered (then discarded) by the next
//! page that displays flashes. Error responses can queue a flash indirectly by
//! attaching an [`ErrorNotice`] extension, which [`flash_error_notices`] moves
//! into the session.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::middleware::auth::current_user;
use crate::models::session::{CurrentUser, keys};

/// Flash severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    /// Confirmation of a completed action.
    Success,
    /// Something the user needs to fix or retry.
    Error,
}

impl FlashKind {
    /// CSS class used by the layout template.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Error => "flash-error",
        }
    }
}

/// A queued message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// Severity.
    pub kind: FlashKind,
    /// Text shown to the user.
    pub text: String,
}

/// Queue a flash message.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push(
    session: &Session,
    kind: FlashKind,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<FlashMessage> = session.get(keys::FLASH).await?.unwrap_or_default();
    messages.push(FlashMessage {
        kind,
        text: text.into(),
    });
    session.insert(keys::FLASH, messages).await
}

/// Queue a success flash.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn success(
    session: &Session,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, FlashKind::Success, text).await
}

/// Queue an error flash.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn error(
    session: &Session,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, FlashKind::Error, text).await
}

/// Remove and return every queued flash, oldest first.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn take(session: &Session) -> Result<Vec<FlashMessage>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<FlashMessage>>(keys::FLASH)
        .await?
        .unwrap_or_default())
}

/// Per-page context shared by every template: who is logged in and which
/// flashes to show.
///
/// Extracting this consumes the queued flashes.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Signed-in user, if any.
    pub current_user: Option<CurrentUser>,
    /// Flashes to render on this page.
    pub flashes: Vec<FlashMessage>,
}

impl PageContext {
    /// Build the context from `session`, consuming its queued flashes.
    ///
    /// Handlers that can fail after extraction call this on their success
    /// path instead of extracting `PageContext`.
    pub async fn load(session: &Session) -> Self {
        let current_user = current_user(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read current user");
            None
        });
        let flashes = take(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        });

        Self {
            current_user,
            flashes,
        }
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        Ok(Self::load(session).await)
    }
}

/// Response extension asking for an error flash on the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice(pub String);

/// Middleware that turns an [`ErrorNotice`] on the response into an error flash.
///
/// Must run inside the session layer.
pub async fn flash_error_notices(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if let Some(ErrorNotice(text)) = response.extensions().get::<ErrorNotice>()
        && let Err(e) = error(&session, text.clone()).await
    {
        tracing::warn!(error = %e, "Failed to queue error flash");
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn flashes_are_taken_in_order_and_only_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        success(&session, "Product Updated").await.unwrap();
        error(&session, "price cannot be negative").await.unwrap();

        let flashes = take(&session).await.unwrap();
        assert_eq!(
            flashes,
            vec![
                FlashMessage {
                    kind: FlashKind::Success,
                    text: "Product Updated".to_owned(),
                },
                FlashMessage {
                    kind: FlashKind::Error,
                    text: "price cannot be negative".to_owned(),
                },
            ]
        );
        assert!(take(&session).await.unwrap().is_empty());
    }

    #[test]
    fn css_classes() {
        assert_eq!(FlashKind::Success.css_class(), "flash-success");
        assert_eq!(FlashKind::Error.css_class(), "flash-error");
    }
}
