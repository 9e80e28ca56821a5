//! # ModKit - shared HTTP kit for the polls modules
//!
//! Pieces every module needs but none of them owns:
//!
//! - **Problem responses**: the JSON error body (`{message, code, status}`) and its axum wrapper
//! - **Bearer auth**: a `TokenVerifier` port plus the middleware that guards protected routes
//! - **Traced HTTP client**: `reqwest` wrapper that opens a span per outgoing call
//! - **Shutdown**: waits for SIGINT/SIGTERM so the server can drain gracefully

pub mod api;
pub mod http;
pub mod shutdown;

pub use api::auth::{
    bearer_token, require_bearer, AuthUser, TokenError, TokenVerifier, NO_TOKEN, TOKEN_FAILED,
};
pub use api::problem::{
    bad_request, forbidden, internal_error, not_found, unauthorized, Problem, ProblemResponse,
};
pub use http::client::TracedClient;
pub use shutdown::wait_for_shutdown;
