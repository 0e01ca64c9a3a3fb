//! Session notification handler
//!
//! `POST /api/v1/` accepts a session id and hands it to the [`SessionNotifier`],
//! which calls the chat service later on its own task. The caller gets its 200
//! straight away and never learns how the callback went.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Rejection, Reply};

use super::generic::ApiError;
use crate::notifier::SessionNotifier;

/// Notify request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    /// Chat session to call back. Missing or `null` is treated as empty.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Handler for `POST /api/v1/`.
///
/// # Arguments
///
/// * `body` - Raw request body
/// * `notifier` - Scheduler for the deferred callback
///
/// # Returns
///
/// * `Ok(warp::Reply)` - Empty 200 once the callback is scheduled
/// * `Err(warp::Rejection)` - Body is not a valid `NotifyRequest`
pub async fn notify_handler(body: Bytes, notifier: SessionNotifier) -> Result<impl Reply, Rejection> {
    let request: NotifyRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("POST /api/v1/ - invalid body: {}", e);
        warp::reject::custom(ApiError::InvalidJson(e.to_string()))
    })?;

    let session_id = request.session_id.unwrap_or_default();
    info!(
        session_id = %session_id,
        delay_ms = notifier.delay().as_millis() as u64,
        "Accepted session notification"
    );
    // Detached: the handle is dropped and the task outlives this request.
    let _callback = notifier.schedule(session_id);

    Ok(StatusCode::OK)
}
