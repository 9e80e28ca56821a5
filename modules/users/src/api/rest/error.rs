use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};

use crate::domain::error::DomainError;

fn from_parts(status: StatusCode, code: &str, message: &str) -> ProblemResponse {
    ProblemResponse(Problem::new(status, message).with_code(code))
}

/// Map a domain error to the JSON error body clients see.
pub fn map_domain_error(e: &DomainError) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { .. } => {
            from_parts(StatusCode::NOT_FOUND, "USERS_NOT_FOUND", "User not found")
        }
        DomainError::EmailAlreadyExists { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_ALREADY_EXISTS",
            "User already exists",
        ),
        DomainError::InvalidEmail { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_INVALID_EMAIL",
            "Invalid email address",
        ),
        DomainError::EmptyName => {
            from_parts(StatusCode::BAD_REQUEST, "USERS_VALIDATION", "Name is required")
        }
        DomainError::PasswordTooShort { min } => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_VALIDATION",
            &format!("Password must be at least {min} characters long"),
        ),
        DomainError::InvalidCredentials => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_INVALID_CREDENTIALS",
            "Invalid credentials",
        ),
        DomainError::Credentials { .. } | DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Internal error in users module");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "USERS_INTERNAL",
                "Server error",
            )
        }
    }
}
