//! User accounts: registration, login and the caller's own profile.
//!
//! Layering follows the rest of the workspace: `contract` holds the plain
//! models, `domain` the rules, `infra` the SeaORM storage, `api::rest` the HTTP
//! surface.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use contract::model::{NewUser, User};
pub use domain::credentials::{JwtCodec, PasswordHasher};
pub use domain::service::{Service, ServiceConfig};
pub use infra::storage::migrations::Migrator;
