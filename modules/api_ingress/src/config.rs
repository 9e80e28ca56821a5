use std::time::Duration;

use runtime::ServerConfig;
use serde::{Deserialize, Serialize};

/// HTTP host settings derived from the `server` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Per-request deadline; zero disables the timeout layer.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    #[serde(default = "default_cors")]
    pub cors_enabled: bool,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_timeout(),
            body_limit_bytes: default_body_limit(),
            cors_enabled: default_cors(),
        }
    }
}

impl From<&ServerConfig> for ApiIngressConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(server.timeout_sec),
            body_limit_bytes: server.body_limit_mb.saturating_mul(1024 * 1024),
            cors_enabled: server.cors_enabled,
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

fn default_cors() -> bool {
    true
}
