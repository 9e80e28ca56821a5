use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Router,
};
use modkit::{require_bearer, TokenVerifier};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Routes relative to the `/api/users` mount point.
pub fn router(service: Arc<Service>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let protected = Router::new()
        .route("/profile", get(handlers::profile))
        .route_layer(from_fn_with_state(verifier, require_bearer));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected)
        .layer(Extension(service))
}
