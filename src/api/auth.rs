//! Login stub and API key gate
//!
//! `POST /api/auth` accepts any non-blank `cpf` and answers with a random 4-digit
//! token. Nothing is stored; the token is never checked anywhere. The protected
//! `/api/v1` group is guarded by [`with_api_key`] instead.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use warp::http::HeaderMap;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

use super::generic::ApiError;
use crate::config::Config;
use crate::fixtures::MASKED_EMAIL;

/// Header carrying the shared secret on protected routes.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Tax id of the guardian; a missing or null value counts as blank
    #[serde(default)]
    pub cpf: Option<String>,
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Four-digit numeric token
    pub token: String,
    /// Masked e-mail the token was "sent" to
    pub email: String,
}

/// Generates a login token: a uniformly random integer in `1000..=9999` as a string.
pub fn generate_token() -> String {
    rand::thread_rng().gen_range(1000..=9999u32).to_string()
}

/// Handler for `POST /api/auth`.
///
/// # Arguments
///
/// * `body` - Raw request body
///
/// # Returns
///
/// * `Ok(warp::Reply)` - JSON `LoginResponse`
/// * `Err(warp::Rejection)` - Malformed JSON or blank `cpf`
pub async fn login_handler(body: Bytes) -> Result<impl Reply, Rejection> {
    let request: LoginRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("POST /api/auth - invalid body: {}", e);
        warp::reject::custom(ApiError::InvalidJson(e.to_string()))
    })?;

    let cpf = request.cpf.as_deref().map(str::trim).unwrap_or_default();
    if cpf.is_empty() {
        return Err(warp::reject::custom(ApiError::MissingTaxId));
    }

    Ok(warp::reply::json(&LoginResponse {
        token: generate_token(),
        email: MASKED_EMAIL.to_string(),
    }))
}

/// Creates the filter guarding the protected route group.
///
/// The `X-API-KEY` header is compared byte-for-byte with the configured key. A
/// missing or empty header never matches. Rejects with `ApiError::InvalidApiKey`.
pub fn with_api_key(config: Arc<Config>) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::headers_cloned()
        .and_then(move |headers: HeaderMap| {
            let config = config.clone();
            async move {
                let received = headers
                    .get(API_KEY_HEADER)
                    .map(|value| value.as_bytes())
                    .unwrap_or_default();

                if received.is_empty() || received != config.api_key.as_bytes() {
                    debug!("Rejected request with missing or invalid API key");
                    return Err(warp::reject::custom(ApiError::InvalidApiKey));
                }
                Ok(())
            }
        })
        .untuple_one()
}
