use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Extension, Router,
};
use modkit::{require_bearer, TokenVerifier};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Routes relative to the `/api/polls` mount point. Reads and voting are
/// public; create, update and delete need a bearer token.
pub fn router(service: Arc<Service>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let auth = from_fn_with_state(verifier, require_bearer);

    Router::new()
        .route(
            "/",
            get(handlers::list_polls).merge(post(handlers::create_poll).route_layer(auth.clone())),
        )
        .route("/vote", post(handlers::vote))
        .route("/user/{user_id}", get(handlers::list_polls_by_owner))
        .route(
            "/{poll_id}",
            get(handlers::get_poll).merge(
                put(handlers::update_poll)
                    .delete(handlers::delete_poll)
                    .route_layer(auth),
            ),
        )
        .layer(Extension(service))
}
