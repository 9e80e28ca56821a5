use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("no image supplied")]
    Empty,

    #[error("image payload is not valid base64: {0}")]
    InvalidPayload(String),

    /// The remote URL could not be downloaded (connect, timeout or non-2xx).
    #[error("image fetch failed: {0}")]
    FetchFailed(String),

    #[error("image optimization failed: {0}")]
    OptimizationFailed(String),
}

/// Output of the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedImage {
    /// Base-64 (standard alphabet) of the optimized bytes.
    pub encoded: String,
    pub original_size: usize,
    pub optimized_size: usize,
}

/// Turns client input (URL, data URI or bare base-64) into a stored image.
#[async_trait]
pub trait ImageIngestor: Send + Sync {
    async fn ingest(&self, input: &str) -> Result<IngestedImage, ImageError>;
}

/// External compression step. Not retried; a failure aborts the poll operation.
#[async_trait]
pub trait ImageOptimizer: Send + Sync {
    async fn optimize(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ImageError>;
}
