//! Process-level plumbing for the polls server: typed configuration and logging.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    AppConfig, AuthConfig, CliArgs, DatabaseConfig, ImagesConfig, LoggingConfig, Section,
    ServerConfig,
};
