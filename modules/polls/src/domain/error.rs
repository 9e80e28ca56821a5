use thiserror::Error;
use uuid::Uuid;

use crate::domain::ports::ImageError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    /// `id` is kept as text: ids that do not parse are "not found" too.
    #[error("Poll not found: {id}")]
    PollNotFound { id: String },

    #[error("Option {option_id} not found in poll {poll_id}")]
    OptionNotFound { poll_id: Uuid, option_id: String },

    #[error("No polls found for owner {owner}")]
    NoPollsForOwner { owner: String },

    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Poll must have between {min} and {max} options, got {got}")]
    InvalidOptionCount { min: usize, max: usize, got: usize },

    #[error("Image is required")]
    ImageRequired,

    #[error("User {caller} may not {action} poll {id}")]
    NotOwner {
        id: Uuid,
        caller: Uuid,
        action: &'static str,
    },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn poll_not_found(id: impl ToString) -> Self {
        Self::PollNotFound { id: id.to_string() }
    }

    pub fn option_not_found(poll_id: Uuid, option_id: impl ToString) -> Self {
        Self::OptionNotFound {
            poll_id,
            option_id: option_id.to_string(),
        }
    }

    pub fn no_polls_for_owner(owner: impl ToString) -> Self {
        Self::NoPollsForOwner {
            owner: owner.to_string(),
        }
    }

    pub fn not_owner(id: Uuid, caller: Uuid, action: &'static str) -> Self {
        Self::NotOwner { id, caller, action }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
