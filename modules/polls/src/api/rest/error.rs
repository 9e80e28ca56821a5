use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};

use crate::domain::error::DomainError;
use crate::domain::ports::ImageError;

fn from_parts(status: StatusCode, code: &str, message: impl Into<String>) -> ProblemResponse {
    ProblemResponse(Problem::new(status, message).with_code(code))
}

/// Map a domain error to the JSON error body clients see.
pub fn map_domain_error(e: &DomainError) -> ProblemResponse {
    match e {
        DomainError::PollNotFound { .. } => {
            from_parts(StatusCode::NOT_FOUND, "POLLS_NOT_FOUND", "Poll not found")
        }
        DomainError::OptionNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "POLLS_OPTION_NOT_FOUND",
            "Option not found",
        ),
        DomainError::NoPollsForOwner { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "POLLS_NONE_FOR_USER",
            "No polls found for this user.",
        ),
        DomainError::EmptyQuestion => {
            from_parts(StatusCode::BAD_REQUEST, "POLLS_VALIDATION", "Question is required")
        }
        DomainError::InvalidOptionCount { min, max, .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "POLLS_OPTION_COUNT",
            format!("Poll must have between {min} and {max} options"),
        ),
        DomainError::ImageRequired | DomainError::Image(ImageError::Empty) => {
            from_parts(StatusCode::BAD_REQUEST, "POLLS_IMAGE_REQUIRED", "Image is required")
        }
        DomainError::Image(ImageError::InvalidPayload(_)) => from_parts(
            StatusCode::BAD_REQUEST,
            "POLLS_IMAGE_INVALID",
            "Invalid image payload",
        ),
        DomainError::NotOwner { action, .. } => from_parts(
            StatusCode::FORBIDDEN,
            "POLLS_FORBIDDEN",
            format!("You can only {action} your own polls"),
        ),
        DomainError::Image(ImageError::FetchFailed(_) | ImageError::OptimizationFailed(_)) => {
            tracing::error!(error = ?e, "Image ingestion failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "POLLS_IMAGE_UPSTREAM",
                "Image processing failed",
            )
        }
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_DB", "Server error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn render(e: DomainError) -> (u16, String) {
        let ProblemResponse(p) = map_domain_error(&e);
        (p.status, p.message)
    }

    #[test]
    fn client_visible_messages() {
        let id = Uuid::new_v4();
        assert_eq!(
            render(DomainError::poll_not_found("x")),
            (404, "Poll not found".into())
        );
        assert_eq!(
            render(DomainError::option_not_found(id, "x")),
            (404, "Option not found".into())
        );
        assert_eq!(
            render(DomainError::InvalidOptionCount {
                min: 2,
                max: 5,
                got: 1
            }),
            (400, "Poll must have between 2 and 5 options".into())
        );
        assert_eq!(
            render(DomainError::not_owner(id, id, "update")),
            (403, "You can only update your own polls".into())
        );
        assert_eq!(
            render(DomainError::not_owner(id, id, "delete")),
            (403, "You can only delete your own polls".into())
        );
        assert_eq!(
            render(DomainError::no_polls_for_owner(id)),
            (404, "No polls found for this user.".into())
        );
    }

    #[test]
    fn upstream_failures_do_not_leak_details() {
        let (status, message) = render(DomainError::Image(ImageError::FetchFailed(
            "connect refused 10.0.0.1".into(),
        )));
        assert_eq!(status, 500);
        assert_eq!(message, "Image processing failed");

        let (status, message) = render(DomainError::database("disk I/O error"));
        assert_eq!(status, 500);
        assert_eq!(message, "Server error");
    }
}
