//! Generic API structures and handlers
//!
//! This module contains the shared response structures, the error type every handler
//! rejects with, the global rejection handler, and the `ApiServer` that wires all
//! routes together.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use warp::{http::StatusCode, Filter, Rejection, Reply};

use super::{auth, enrollment, notify};
use crate::config::Config;
use crate::notifier::SessionNotifier;

/// Largest request body accepted by the login and notify routes, in bytes.
pub const MAX_BODY_BYTES: u64 = 16 * 1024;

// ============================================================================
// SHARED REQUEST/RESPONSE STRUCTURES
// ============================================================================

/// Envelope for successful lookup responses: `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Body of every error response.
///
/// Input parsing failures fill `error`; every other failure fills `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    fn error(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// CUSTOM REJECTION TYPES
// ============================================================================

/// Failures a handler or filter can reject a request with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is not valid JSON for the endpoint
    #[error("{0}")]
    InvalidJson(String),
    /// Login body without a usable `cpf`
    #[error("cpf is required")]
    MissingTaxId,
    /// `X-API-KEY` missing, empty or wrong
    #[error("Invalid API Key")]
    InvalidApiKey,
    /// Lookup hit the not-found sentinel
    #[error("not found")]
    NotFound,
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    /// HTTP status returned for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) | ApiError::MissingTaxId => StatusCode::BAD_REQUEST,
            ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::InvalidJson(e) => ErrorResponse::error(e.clone()),
            other => ErrorResponse::message(other.to_string()),
        }
    }
}

// ============================================================================
// WARP FILTER HELPERS
// ============================================================================

/// Creates a warp filter that injects the session notifier into handlers.
pub fn with_notifier(
    notifier: SessionNotifier,
) -> impl Filter<Extract = (SessionNotifier,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || notifier.clone())
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Global rejection handler for all API routes.
///
/// Converts `ApiError` and warp's built-in rejections into a JSON `ErrorResponse`
/// with the matching status code.
///
/// # Arguments
///
/// * `rej` - The warp rejection to handle
///
/// # Returns
///
/// A warp reply with an error response
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, body) = if let Some(err) = rej.find::<ApiError>() {
        (err.status_code(), err.to_response())
    } else if rej.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorResponse::message("Endpoint not found"))
    } else if rej.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, ErrorResponse::message("Request body too large"))
    } else if rej.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, ErrorResponse::message("Content-Length required"))
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, ErrorResponse::message("Method not allowed"))
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::message("Internal server error"))
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

// ============================================================================
// API SERVER IMPLEMENTATION
// ============================================================================

/// REST API server for the mock enrollment service.
///
/// Routes:
/// - `GET /health` and `POST /api/auth` are public
/// - everything under `/api/v1` requires the `X-API-KEY` header
pub struct ApiServer {
    /// Service configuration
    config: Arc<Config>,
    /// Deferred callback scheduler for `POST /api/v1/`
    notifier: SessionNotifier,
}

impl ApiServer {
    /// Creates a new API server.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated service configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ApiServer)` - Server ready to run
    /// * `Err(anyhow::Error)` - The callback notifier could not be built
    pub fn new(config: Config) -> Result<Self> {
        let notifier = SessionNotifier::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            notifier,
        })
    }

    /// Runs the server until Ctrl-C is received.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await
    }

    /// Runs the server until `shutdown` completes.
    ///
    /// In-flight requests finish before this returns. Callbacks still waiting on
    /// their delay are dropped with the runtime.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Server shut down cleanly
    /// * `Err(anyhow::Error)` - Invalid listen address or bind failure
    pub async fn run_until<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.listen_addr()?;
        let routes = self.create_routes();

        let (bound, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .with_context(|| format!("Failed to bind API server to {}", addr))?;

        info!("API server listening on {}", bound);
        server.await;
        info!("API server stopped");

        Ok(())
    }

    /// Creates all API routes for the server.
    ///
    /// # Returns
    ///
    /// A warp filter containing all API routes
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        // GET /health
        let health = warp::path!("health")
            .and(warp::get())
            .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

        // POST /api/auth
        let login = warp::path!("api" / "auth")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and_then(auth::login_handler);

        // Each protected route checks the key only after its path matched,
        // so unknown paths under /api/v1 still 404
        let api_key = auth::with_api_key(self.config.clone());

        // GET /api/v1/offers/:doc
        let offers = warp::path!("offers" / String)
            .and(warp::get())
            .and(api_key.clone())
            .and_then(enrollment::get_offers_handler);

        // GET /api/v1/:doc
        let lookup = warp::path::param::<String>()
            .and(warp::path::end())
            .and(warp::get())
            .and(api_key.clone())
            .and_then(enrollment::get_enrollment_handler);

        // POST /api/v1/
        let session_notify = warp::path::end()
            .and(warp::post())
            .and(api_key)
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and(with_notifier(self.notifier.clone()))
            .and_then(notify::notify_handler);

        let protected = warp::path!("api" / "v1" / ..).and(offers.or(lookup).or(session_notify));

        health
            .or(login)
            .or(protected)
            .recover(handle_rejection)
            .with(warp::trace::request())
    }

    /// Public method for testing - exposes routes for integration tests
    pub fn test_routes(&self) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        self.create_routes()
    }
}
