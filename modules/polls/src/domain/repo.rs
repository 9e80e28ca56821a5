use crate::contract::model::Poll;
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait PollsRepository: Send + Sync {
    /// Load a poll with its options (in stored order).
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Poll>>;
    /// Every poll, oldest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Poll>>;
    /// Polls created by `owner`, oldest first.
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Poll>>;
    /// Insert the poll and all its options atomically.
    async fn insert(&self, poll: Poll) -> anyhow::Result<()>;
    /// Update the poll row; with `replace_options` the option rows are swapped
    /// for `poll.options` in the same transaction. Returns false if the poll
    /// no longer exists.
    async fn update(&self, poll: Poll, replace_options: bool) -> anyhow::Result<bool>;
    /// Delete by id (options go with it). Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Atomically add one vote. Returns false if no option `option_id`
    /// belongs to poll `poll_id`.
    async fn increment_vote(&self, poll_id: Uuid, option_id: Uuid) -> anyhow::Result<bool>;
}
