use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Pure poll model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub id: Uuid,
    pub question: String,
    /// In the order the owner supplied them.
    pub options: Vec<PollOption>,
    /// Base-64 encoding of the optimized image bytes.
    pub image: String,
    pub image_size: ImageSize,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub id: Uuid,
    pub text: String,
    pub votes: i64,
}

/// Byte counts before and after optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSize {
    pub original: i64,
    pub optimized: i64,
}

/// Data for creating a poll. Option texts are raw; blank ones are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewPoll {
    pub question: String,
    pub options: Vec<String>,
    /// Remote URL, data URI or bare base-64.
    pub image: Option<String>,
}

/// Partial update. `options`, when present, replaces the whole set and resets votes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollPatch {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub image: Option<String>,
}

impl Poll {
    pub fn option(&self, id: Uuid) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == id)
    }
}
