pub mod images;

pub use images::{ImageError, ImageIngestor, ImageOptimizer, IngestedImage};
