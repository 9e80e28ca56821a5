use std::sync::{Arc, LazyLock};

use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{NewUser, User};
use crate::domain::credentials::{JwtCodec, PasswordHasher};
use crate::domain::error::DomainError;
use crate::domain::repo::{DuplicateEmail, StoredUser, UsersRepository};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6})$").expect("static email regex")
});

/// Domain service with business rules for accounts and credentials.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    hasher: PasswordHasher,
    tokens: Arc<JwtCodec>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub min_password_len: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_password_len: 6,
        }
    }
}

impl Service {
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        hasher: PasswordHasher,
        tokens: Arc<JwtCodec>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            config,
        }
    }

    /// Create an account and return a token for it.
    #[instrument(
        name = "users.service.register",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn register(&self, new_user: NewUser) -> Result<String, DomainError> {
        info!("Registering user");

        let name = new_user.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        let email = normalize_email(&new_user.email);
        if !EMAIL_RE.is_match(&email) {
            return Err(DomainError::invalid_email(email));
        }
        if new_user.password.chars().count() < self.config.min_password_len {
            return Err(DomainError::password_too_short(self.config.min_password_len));
        }

        if self
            .repo
            .email_exists(&email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::email_already_exists(email));
        }

        let password_hash = self
            .hasher
            .hash(&new_user.password)
            .await
            .map_err(|e| DomainError::credentials(e.to_string()))?;

        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            created_at: Utc::now(),
        };
        let id = user.id;

        // A concurrent registration can still win the race to the unique index.
        if let Err(e) = self.repo.insert(StoredUser { user, password_hash }).await {
            return Err(match e.downcast_ref::<DuplicateEmail>() {
                Some(DuplicateEmail(email)) => DomainError::email_already_exists(email.clone()),
                None => DomainError::database(e.to_string()),
            });
        }

        info!(user_id = %id, "User registered");
        self.issue_token(id)
    }

    /// Check credentials and return a token. Unknown email and wrong password
    /// are reported identically.
    #[instrument(name = "users.service.login", skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        debug!("Login attempt");

        let email = normalize_email(email);
        let Some(stored) = self
            .repo
            .find_by_email(&email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        else {
            return Err(DomainError::InvalidCredentials);
        };

        let ok = self
            .hasher
            .verify(password, &stored.password_hash)
            .await
            .map_err(|e| DomainError::credentials(e.to_string()))?;
        if !ok {
            return Err(DomainError::InvalidCredentials);
        }

        self.issue_token(stored.user.id)
    }

    #[instrument(name = "users.service.profile", skip(self), fields(user_id = %id))]
    pub async fn profile(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    fn issue_token(&self, id: Uuid) -> Result<String, DomainError> {
        self.tokens
            .issue(id)
            .map_err(|e| DomainError::credentials(e.to_string()))
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        for ok in ["a@b.co", "first.last@mail.example.org", "x_y-z@host.museum"] {
            assert!(EMAIL_RE.is_match(ok), "{ok}");
        }
        for bad in ["", "plain", "a@b", "a@b.c", "a b@c.com", "a@b.toolongtld"] {
            assert!(!EMAIL_RE.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
    }
}
