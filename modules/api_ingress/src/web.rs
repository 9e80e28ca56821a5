use axum::{http::Uri, response::Json};
use modkit::{api::problem::ProblemResponse, not_found};
use serde_json::{json, Value};

pub async fn root() -> &'static str {
    "Server is running..."
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Unknown paths get the same JSON error body as everything else.
pub async fn fallback(uri: Uri) -> ProblemResponse {
    tracing::debug!(path = %uri.path(), "no route matched");
    not_found("Route not found")
}
