use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::domain::ports::{ImageError, ImageOptimizer};
use crate::infra::images::{read_capped, DEFAULT_MAX_IMAGE_BYTES};
use modkit::TracedClient;

/// Client for a TinyPNG-compatible compression API.
///
/// `POST {base}/shrink` with the raw bytes answers `{"output":{"url":..}}`;
/// the compressed image is then downloaded from that URL.
pub struct TinifyOptimizer {
    client: TracedClient,
    base: Url,
    api_key: String,
    max_bytes: usize,
}

#[derive(Debug, Deserialize)]
struct ShrinkResponse {
    output: ShrinkOutput,
}

#[derive(Debug, Deserialize)]
struct ShrinkOutput {
    url: String,
}

fn failed(what: &str, e: impl std::fmt::Display) -> ImageError {
    ImageError::OptimizationFailed(format!("{what}: {e}"))
}

impl TinifyOptimizer {
    pub fn new(client: TracedClient, base: Url, api_key: String) -> Self {
        Self {
            client,
            base,
            api_key,
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Cap on the compressed image download.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn shrink_url(&self) -> Result<Url, ImageError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| failed("shrink", "invalid optimizer base URL"))?
            .pop_if_empty()
            .push("shrink");
        Ok(url)
    }

    async fn send(&self, method: Method, url: &str, body: Option<Vec<u8>>) -> Result<reqwest::Response, ImageError> {
        let mut builder = self
            .client
            .request(method, url)
            .basic_auth("api", Some(&self.api_key));
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }
        let req = builder.build().map_err(|e| failed("request", e))?;
        let response = self
            .client
            .execute(req)
            .await
            .map_err(|e| failed("transport", e))?;
        if !response.status().is_success() {
            return Err(failed(url, format!("status {}", response.status())));
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageOptimizer for TinifyOptimizer {
    #[instrument(name = "polls.http.optimizer.shrink", skip_all, fields(base = %self.base, input_bytes = bytes.len()))]
    async fn optimize(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        let shrink_url = self.shrink_url()?;
        let shrink: ShrinkResponse = self
            .send(Method::POST, shrink_url.as_str(), Some(bytes))
            .await?
            .json()
            .await
            .map_err(|e| failed("shrink response", e))?;

        let download = self.send(Method::GET, &shrink.output.url, None).await?;
        read_capped(download, self.max_bytes)
            .await
            .map_err(|e| failed("download", e))
    }
}

/// Returns the input unchanged; used when no compression service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughOptimizer;

#[async_trait]
impl ImageOptimizer for PassthroughOptimizer {
    async fn optimize(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        Ok(bytes)
    }
}
