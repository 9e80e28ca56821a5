use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Public view of an account. The password hash never leaves the domain layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Registration input as received from the client (not yet normalized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}
