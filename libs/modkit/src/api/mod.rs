//! Request-side building blocks shared by the REST modules.

pub mod auth;
pub mod problem;
