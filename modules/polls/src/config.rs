use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the polls module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollsConfig {
    #[serde(default = "default_min_options")]
    pub min_options: usize,
    #[serde(default = "default_max_options")]
    pub max_options: usize,
    /// Compression service key; empty means images are stored as uploaded.
    #[serde(default)]
    pub optimizer_api_key: String,
    #[serde(default = "default_optimizer_base_url")]
    pub optimizer_base_url: String,
    /// Applies to every outbound image call (remote fetch and compression).
    #[serde(default = "default_image_timeout", with = "humantime_serde")]
    pub image_timeout: Duration,
    /// Largest image body accepted from a remote host or the compression service.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for PollsConfig {
    fn default() -> Self {
        Self {
            min_options: default_min_options(),
            max_options: default_max_options(),
            optimizer_api_key: String::new(),
            optimizer_base_url: default_optimizer_base_url(),
            image_timeout: default_image_timeout(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_min_options() -> usize {
    2
}

fn default_max_options() -> usize {
    5
}

fn default_optimizer_base_url() -> String {
    "https://api.tinify.com".to_string()
}

fn default_image_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_image_bytes() -> usize {
    crate::infra::images::DEFAULT_MAX_IMAGE_BYTES
}
