//! Mock Enrollment API Library
//!
//! This crate provides a mock HTTP API serving fixture enrollment data (offers,
//! guardian and student records), a login stub, and a deferred callback to a chat
//! service. Nothing is persisted.

pub mod api;
pub mod config;
pub mod fixtures;
pub mod notifier;

// Re-export commonly used types
pub use api::{ApiError, ApiServer};
pub use crate::config::Config;
pub use notifier::{NotifyError, SessionNotifier};
