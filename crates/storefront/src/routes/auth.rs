//! Authentication route handlers.
//!
//! Handles signup, login and logout with local username/password accounts.
//! Outcomes are reported through flash messages and redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::take_redirect_target;
use crate::middleware::{PageContext, flash, set_current_user, sign_out};
use crate::models::session::CurrentUser;
use crate::models::user::User;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Signup form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub page: PageContext,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(page: PageContext) -> SignupTemplate {
    SignupTemplate { page }
}

/// Handle signup form submission.
///
/// On success the new user is signed in immediately.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let registered = AuthService::new(state.users())
        .register(&form.username, &form.email, &form.password)
        .await;

    let user = match registered {
        Ok(user) => user,
        Err(e) => return reject(&session, e, "/signup").await,
    };

    tracing::info!(user_id = %user.id, "User registered");
    sign_in(&session, &user).await?;
    flash::success(&session, "Welcome to App").await?;
    Ok(Redirect::to("/products").into_response())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: PageContext) -> LoginTemplate {
    LoginTemplate { page }
}

/// Handle login form submission.
///
/// Redirects to the page the auth gate remembered, or to `/products`.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let authenticated = AuthService::new(state.users())
        .login(&form.username, &form.password)
        .await;

    let user = match authenticated {
        Ok(user) => user,
        Err(e) => return reject(&session, e, "/login").await,
    };

    tracing::info!(user_id = %user.id, "User logged in");
    sign_in(&session, &user).await?;
    flash::success(&session, "Welcome back to App!").await?;

    let target = take_redirect_target(&session)
        .await?
        .unwrap_or_else(|| "/products".to_owned());
    Ok(Redirect::to(&target).into_response())
}

/// Log out and return to the product listing.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    sign_out(&session).await?;
    clear_sentry_user();
    flash::success(&session, "You are logged out!").await?;
    Ok(Redirect::to("/products").into_response())
}

// =============================================================================
// Helpers
// =============================================================================

async fn sign_in(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser::signed_in_now(user.id, user.username.clone());
    set_current_user(session, &current).await?;
    set_sentry_user(&user.id, user.username.as_str());
    Ok(())
}

/// Flash a user-fixable auth error and go back to `form_path`; anything
/// else is a server error.
async fn reject(session: &Session, err: AuthError, form_path: &str) -> Result<Response> {
    let Some(message) = err.user_message() else {
        return Err(AppError::Auth(err));
    };

    tracing::info!(reason = %err, "Authentication rejected");
    flash::error(session, message).await?;
    Ok(Redirect::to(form_path).into_response())
}
