//! Image ingestion: client input -> raw bytes -> compression service -> base-64.

pub mod optimizer;
pub mod pipeline;
pub mod source;

use std::sync::Arc;

use anyhow::Context;
use modkit::TracedClient;
use url::Url;

use crate::config::PollsConfig;
use crate::domain::ports::{ImageIngestor, ImageOptimizer};

pub use optimizer::{PassthroughOptimizer, TinifyOptimizer};
pub use pipeline::ImagePipeline;
pub use source::ImageSource;

/// Upper bound on any image body read from the network, matching the
/// request body limit.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Read a response body, failing as soon as it grows past `limit` bytes.
///
/// An advertised `Content-Length` above the limit is rejected before any
/// chunk is read. The error string is handed to the caller's mapper.
pub(crate) async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, String> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(format!("body of {len} bytes exceeds the {limit} byte limit"));
        }
    }
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
        if body.len() + chunk.len() > limit {
            return Err(format!("body exceeds the {limit} byte limit"));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Build the pipeline from configuration. Without an API key images are
/// stored as uploaded.
pub fn build_ingestor(cfg: &PollsConfig) -> anyhow::Result<Arc<dyn ImageIngestor>> {
    let client = TracedClient::with_timeout(cfg.image_timeout)
        .context("failed to build image HTTP client")?;

    let optimizer: Arc<dyn ImageOptimizer> = if cfg.optimizer_api_key.trim().is_empty() {
        tracing::warn!("images: no optimizer API key configured, images are stored unoptimized");
        Arc::new(PassthroughOptimizer)
    } else {
        let base = Url::parse(&cfg.optimizer_base_url)
            .with_context(|| format!("invalid optimizer base URL '{}'", cfg.optimizer_base_url))?;
        Arc::new(
            TinifyOptimizer::new(client.clone(), base, cfg.optimizer_api_key.clone())
                .with_max_bytes(cfg.max_image_bytes),
        )
    };

    Ok(Arc::new(
        ImagePipeline::new(client, optimizer).with_max_bytes(cfg.max_image_bytes),
    ))
}
