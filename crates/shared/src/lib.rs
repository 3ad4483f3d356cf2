//! Shared types, errors, and configuration for Farebox.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The request context carrying the acting principal and company scope
//! - Application-wide error types
//! - Configuration management
//! - The outbound ride-platform notifier

pub mod config;
pub mod error;
pub mod platform;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use platform::{PlatformNotifier, TransactionOutcome, TransactionStatusUpdate};
pub use types::RequestContext;
