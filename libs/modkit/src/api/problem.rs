use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// JSON error body returned by every endpoint.
///
/// Clients only rely on `message`; `code` is a stable machine-readable tag and
/// `status` mirrors the HTTP status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Human-readable explanation shown to the user.
    pub message: String,
    /// Machine-readable error code defined by the owning module.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
}

impl Problem {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: String::new(),
            status: status.as_u16(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Axum response wrapper that renders `Problem` with the matching status.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        (status, axum::Json(self.0)).into_response()
    }
}

pub fn bad_request(message: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::BAD_REQUEST, message)
        .with_code("BAD_REQUEST")
        .into()
}

pub fn unauthorized(message: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::UNAUTHORIZED, message)
        .with_code("UNAUTHORIZED")
        .into()
}

pub fn forbidden(message: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::FORBIDDEN, message)
        .with_code("FORBIDDEN")
        .into()
}

pub fn not_found(message: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::NOT_FOUND, message)
        .with_code("NOT_FOUND")
        .into()
}

pub fn internal_error(message: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        .with_code("INTERNAL")
        .into()
}
