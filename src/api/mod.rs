//! REST API Server Module
//!
//! This module provides the REST API server for the mock enrollment service:
//! a public login stub and an `X-API-KEY` protected group serving fixture data
//! and accepting deferred session notifications.

// Shared structures, rejection handling and the server itself
mod generic;

// Login stub and API key gate
pub mod auth;

// Offer listing and guardian/student lookup
pub mod enrollment;

// Deferred session notification
pub mod notify;

pub use generic::{handle_rejection, ApiError, ApiServer, DataResponse, ErrorResponse, MAX_BODY_BYTES};
