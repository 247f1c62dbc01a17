//! HTML form method override.
//!
//! Browsers only submit GET and POST forms, so edit and delete forms post to
//! `...?_method=PUT` or `...?_method=DELETE`. The rewrite must happen before
//! routing, so it wraps the whole [`Router`](axum::Router) as a
//! request-mapping service.

use axum::{extract::Request, http::Method};
use url::form_urlencoded;

/// Query parameter naming the intended method.
pub const METHOD_PARAM: &str = "_method";

/// Rewrite `POST ...?_method=PUT|PATCH|DELETE` to that method.
///
/// Other methods, and unknown override values, pass through unchanged.
pub fn method_override(mut request: Request) -> Request {
    if request.method() != Method::POST {
        return request;
    }

    if let Some(method) = request.uri().query().and_then(override_from_query) {
        tracing::trace!(%method, path = %request.uri().path(), "Method override");
        *request.method_mut() = method;
    }

    request
}

fn override_from_query(query: &str) -> Option<Method> {
    let (_, value) = form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == METHOD_PARAM)?;

    match value.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
