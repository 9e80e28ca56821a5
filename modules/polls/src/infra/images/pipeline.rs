use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, instrument};

use crate::domain::ports::{ImageError, ImageIngestor, ImageOptimizer, IngestedImage};
use crate::infra::images::source::{decode_inline, ImageSource};
use crate::infra::images::{read_capped, DEFAULT_MAX_IMAGE_BYTES};
use modkit::TracedClient;

/// Acquire -> optimize -> report. Single pass, no retries.
pub struct ImagePipeline {
    client: TracedClient,
    optimizer: Arc<dyn ImageOptimizer>,
    max_bytes: usize,
}

impl ImagePipeline {
    pub fn new(client: TracedClient, optimizer: Arc<dyn ImageOptimizer>) -> Self {
        Self {
            client,
            optimizer,
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Cap on a downloaded image body.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| ImageError::FetchFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::FetchFailed(format!("{url} answered {status}")));
        }
        read_capped(response, self.max_bytes)
            .await
            .map_err(|e| ImageError::FetchFailed(format!("{url}: {e}")))
    }
}

#[async_trait]
impl ImageIngestor for ImagePipeline {
    #[instrument(name = "polls.images.ingest", skip_all)]
    async fn ingest(&self, input: &str) -> Result<IngestedImage, ImageError> {
        let bytes = match ImageSource::parse(input)? {
            ImageSource::Remote(url) => self.fetch(url).await?,
            ImageSource::Inline(payload) => decode_inline(payload)?,
        };
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let original_size = bytes.len();
        let optimized = self.optimizer.optimize(bytes).await?;
        let optimized_size = optimized.len();
        info!(original_size, optimized_size, "image optimized");

        Ok(IngestedImage {
            encoded: STANDARD.encode(&optimized),
            original_size,
            optimized_size,
        })
    }
}
