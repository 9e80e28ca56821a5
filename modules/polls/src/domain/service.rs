use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::PollsConfig;
use crate::contract::model::{ImageSize, NewPoll, Poll, PollOption, PollPatch};
use crate::domain::error::DomainError;
use crate::domain::ports::{ImageIngestor, IngestedImage};
use crate::domain::repo::PollsRepository;

/// Domain service with the poll lifecycle rules.
/// Depends only on the repository and image ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn PollsRepository>,
    images: Arc<dyn ImageIngestor>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub min_options: usize,
    pub max_options: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_options: 2,
            max_options: 5,
        }
    }
}

impl From<&PollsConfig> for ServiceConfig {
    fn from(cfg: &PollsConfig) -> Self {
        Self {
            min_options: cfg.min_options,
            max_options: cfg.max_options,
        }
    }
}

impl Service {
    pub fn new(
        repo: Arc<dyn PollsRepository>,
        images: Arc<dyn ImageIngestor>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            images,
            config,
        }
    }

    /// Create a poll owned by `owner` and return the whole collection.
    /// Nothing is written unless validation and image ingestion both succeed.
    #[instrument(name = "polls.service.create_poll", skip(self, new_poll), fields(owner = %owner))]
    pub async fn create_poll(&self, owner: Uuid, new_poll: NewPoll) -> Result<Vec<Poll>, DomainError> {
        info!("Creating poll");

        let question = new_poll.question.trim().to_string();
        if question.is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        let options = self.build_options(new_poll.options)?;
        let image_input = new_poll
            .image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(DomainError::ImageRequired)?;

        let image = self.images.ingest(image_input).await?;

        let now = Utc::now();
        let poll = Poll {
            id: Uuid::new_v4(),
            question,
            options,
            image: image.encoded.clone(),
            image_size: image_size(&image),
            created_by: owner,
            created_at: now,
            updated_at: now,
        };
        let id = poll.id;

        self.repo
            .insert(poll)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(poll_id = %id, "Poll created");
        self.list_polls().await
    }

    #[instrument(name = "polls.service.list_polls", skip(self))]
    pub async fn list_polls(&self) -> Result<Vec<Poll>, DomainError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "polls.service.get_poll", skip(self), fields(poll_id = %id))]
    pub async fn get_poll(&self, id: Uuid) -> Result<Poll, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::poll_not_found(id))
    }

    /// An owner with no polls is reported as not found.
    #[instrument(name = "polls.service.list_polls_by_owner", skip(self), fields(owner = %owner))]
    pub async fn list_polls_by_owner(&self, owner: Uuid) -> Result<Vec<Poll>, DomainError> {
        let polls = self
            .repo
            .list_by_owner(owner)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if polls.is_empty() {
            return Err(DomainError::no_polls_for_owner(owner));
        }
        Ok(polls)
    }

    /// Add exactly one vote. Anonymous and unlimited.
    #[instrument(
        name = "polls.service.vote",
        skip(self),
        fields(poll_id = %poll_id, option_id = %option_id)
    )]
    pub async fn vote(&self, poll_id: Uuid, option_id: Uuid) -> Result<Poll, DomainError> {
        let counted = self
            .repo
            .increment_vote(poll_id, option_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        let poll = self.get_poll(poll_id).await?;
        if !counted {
            return Err(DomainError::option_not_found(poll_id, option_id));
        }
        debug!("Vote counted");
        Ok(poll)
    }

    /// Owner-only update; returns the whole collection.
    #[instrument(
        name = "polls.service.update_poll",
        skip(self, patch),
        fields(poll_id = %id, caller = %caller)
    )]
    pub async fn update_poll(
        &self,
        caller: Uuid,
        id: Uuid,
        patch: PollPatch,
    ) -> Result<Vec<Poll>, DomainError> {
        info!("Updating poll");

        let mut current = self.get_poll(id).await?;
        if current.created_by != caller {
            return Err(DomainError::not_owner(id, caller, "update"));
        }

        let replace_options = match patch.options {
            Some(raw) => {
                current.options = self.build_options(raw)?;
                true
            }
            None => false,
        };

        if let Some(question) = patch.question.as_deref().map(str::trim) {
            if !question.is_empty() {
                current.question = question.to_string();
            }
        }

        if let Some(input) = patch.image.as_deref().map(str::trim) {
            if !input.is_empty() {
                let image = self.images.ingest(input).await?;
                current.image = image.encoded.clone();
                current.image_size = image_size(&image);
            }
        }

        current.updated_at = Utc::now();
        let updated = self
            .repo
            .update(current, replace_options)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !updated {
            return Err(DomainError::poll_not_found(id));
        }

        info!("Poll updated");
        self.list_polls().await
    }

    #[instrument(
        name = "polls.service.delete_poll",
        skip(self),
        fields(poll_id = %id, caller = %caller)
    )]
    pub async fn delete_poll(&self, caller: Uuid, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting poll");

        let current = self.get_poll(id).await?;
        if current.created_by != caller {
            return Err(DomainError::not_owner(id, caller, "delete"));
        }

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !deleted {
            return Err(DomainError::poll_not_found(id));
        }

        info!("Poll deleted");
        Ok(())
    }

    /// The raw count is checked first, then again after blank texts are dropped,
    /// so a stored poll always has an allowed number of options.
    fn build_options(&self, raw: Vec<String>) -> Result<Vec<PollOption>, DomainError> {
        self.check_option_count(raw.len())?;
        let options: Vec<PollOption> = raw
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|text| PollOption {
                id: Uuid::new_v4(),
                text: text.to_string(),
                votes: 0,
            })
            .collect();
        if options.len() != raw.len() {
            debug!(dropped = raw.len() - options.len(), "Dropped blank options");
        }
        self.check_option_count(options.len())?;
        Ok(options)
    }

    fn check_option_count(&self, got: usize) -> Result<(), DomainError> {
        if got < self.config.min_options || got > self.config.max_options {
            return Err(DomainError::InvalidOptionCount {
                min: self.config.min_options,
                max: self.config.max_options,
                got,
            });
        }
        Ok(())
    }
}

fn image_size(image: &IngestedImage) -> ImageSize {
    ImageSize {
        original: image.original_size as i64,
        optimized: image.optimized_size as i64,
    }
}
