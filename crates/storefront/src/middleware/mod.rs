//! HTTP middleware stack for the catalog.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Method override (wraps the router, runs before routing)
//! 2. Sentry layers (hub per request, HTTP transaction)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Session layer (tower-sessions, signed cookie)
//! 6. Error notices (turn error responses into flash messages)

pub mod auth;
pub mod flash;
pub mod method_override;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, current_user, set_current_user, sign_out};
pub use flash::{ErrorNotice, FlashKind, FlashMessage, PageContext, flash_error_notices};
pub use method_override::method_override;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
