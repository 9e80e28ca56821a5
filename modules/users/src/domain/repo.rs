use crate::contract::model::User;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// A user together with its bcrypt hash, as persisted.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Raised by [`UsersRepository::insert`] when the unique email index rejects
/// the row; callers find it with `anyhow::Error::downcast_ref`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("email '{0}' is already taken")]
pub struct DuplicateEmail(pub String);

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Load a user and its hash by (normalized) email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<StoredUser>>;
    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Insert a fully-formed user. Fails with [`DuplicateEmail`] on a unique violation.
    async fn insert(&self, u: StoredUser) -> anyhow::Result<()>;
}
