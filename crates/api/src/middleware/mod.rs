//! API middleware.

pub mod auth;

pub use auth::{ApiContext, auth_middleware};
