//! Polls: creation with an optimized image, public listing, anonymous voting,
//! owner-only edits and deletion.

// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::model;

pub mod config;
pub use config::PollsConfig;

// === INTERNAL MODULES ===
// Exposed for wiring in the server binary and for tests.
pub mod api;
pub mod domain;
pub mod infra;

pub use domain::service::{Service, ServiceConfig};
pub use infra::storage::migrations::Migrator;
