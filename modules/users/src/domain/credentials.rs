//! Password hashing and access tokens.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use modkit::{TokenError, TokenVerifier};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// bcrypt with a fixed cost. Hashing is CPU-bound, so it runs on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let cost = self.cost;
        let plain = plain.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .context("hashing task panicked")?
            .context("bcrypt hash failed")
    }

    /// `Ok(false)` for a wrong password; `Err` only for a malformed stored hash.
    pub async fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
            .await
            .context("verify task panicked")?
            .context("bcrypt verify failed")
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: Uuid,
    iat: i64,
    exp: i64,
}

/// HS256 tokens carrying `{userId, iat, exp}`.
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    /// Token as if minted at `issued_at` (unix seconds).
    pub fn issue_at(&self, user_id: Uuid, issued_at: i64) -> anyhow::Result<String> {
        let ttl = i64::try_from(self.ttl.as_secs()).context("token ttl out of range")?;
        let claims = Claims {
            user_id,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).context("jwt encode failed")
    }
}

impl TokenVerifier for JwtCodec {
    fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
