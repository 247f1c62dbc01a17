//! Router assembly.
//!
//! [`router`] builds the full axum router with its middleware stack;
//! [`service`] wraps it in the method override so HTML forms can reach
//! `PUT`/`PATCH`/`DELETE` routes. The binary and the integration tests both
//! go through these two functions.

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use tower::util::MapRequest;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::middleware::{
    create_session_layer, flash_error_notices, method_override, request_id_middleware,
};
use crate::routes;
use crate::state::AppState;

/// The complete HTTP service: router plus method override.
pub type CatalogService = MapRequest<Router, fn(Request) -> Request>;

/// Build the router with every route and layer.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `session_store` - Backing store for sessions
pub fn router<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(middleware::from_fn(flash_error_notices))
        .layer(session_layer)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Wrap `router` so `POST ?_method=...` is rewritten before routing.
#[must_use]
pub fn service(router: Router) -> CatalogService {
    MapRequest::new(router, method_override as fn(Request) -> Request)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the product store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.products().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Page not found")
}
