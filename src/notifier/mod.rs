//! Deferred Session Notifier
//!
//! Schedules the one-shot callback to the chat service. Each accepted notify
//! request spawns a detached task that sleeps for the configured delay and then
//! POSTs to `{chat_url}/{session_id}`. The task owns everything it uses and
//! reports its outcome through `tracing` only; the request that scheduled it has
//! long been answered by the time it runs.

use std::time::Duration;

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Config;

/// Errors raised while delivering a session callback.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The configured base URL cannot take extra path segments
    #[error("Callback base URL '{0}' cannot be extended with a session id")]
    InvalidBaseUrl(String),
    /// The HTTP request failed (connect error, timeout, ...)
    #[error("Callback request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Sends delayed callbacks to the chat service.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted, so every
/// scheduled task gets its own handle to the shared connection pool.
#[derive(Debug, Clone)]
pub struct SessionNotifier {
    client: reqwest::Client,
    base_url: Url,
    delay: Duration,
}

impl SessionNotifier {
    /// Creates a notifier from the service configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration (callback URL, delay, timeout)
    ///
    /// # Returns
    ///
    /// * `Ok(SessionNotifier)` - Notifier ready to schedule callbacks
    /// * `Err(anyhow::Error)` - Invalid callback URL or HTTP client setup failure
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.chat_url)
            .with_context(|| format!("Invalid CHAT_URL '{}'", config.chat_url))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.notify_timeout_ms))
            .build()
            .context("Failed to build callback HTTP client")?;

        Ok(Self {
            client,
            base_url,
            delay: Duration::from_millis(config.notify_delay_ms),
        })
    }

    /// Delay applied before each callback fires.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Builds the callback URL for a session.
    ///
    /// The session id is appended as one percent-encoded path segment, so ids
    /// containing `/` or `?` cannot change the target path or query.
    pub fn callback_url(&self, session_id: &str) -> Result<Url, NotifyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NotifyError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(session_id);
        Ok(url)
    }

    /// Sends the callback for `session_id` right away.
    ///
    /// Any HTTP status counts as delivered; only transport failures are errors.
    pub async fn deliver(&self, session_id: &str) -> Result<StatusCode, NotifyError> {
        let url = self.callback_url(session_id)?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Ok(response.status())
    }

    /// Schedules the callback for `session_id` after the configured delay.
    ///
    /// Returns immediately. The returned handle resolves with the delivery result;
    /// callers serving HTTP requests drop it and let the task run detached.
    pub fn schedule(&self, session_id: String) -> JoinHandle<Result<StatusCode, NotifyError>> {
        let notifier = self.clone();
        debug!(
            session_id = %session_id,
            delay_ms = notifier.delay.as_millis() as u64,
            "Scheduled session callback"
        );

        tokio::spawn(async move {
            tokio::time::sleep(notifier.delay).await;

            let result = notifier.deliver(&session_id).await;
            match &result {
                Ok(status) if status.is_success() => {
                    info!(session_id = %session_id, status = status.as_u16(), "Session callback delivered");
                }
                Ok(status) => {
                    warn!(session_id = %session_id, status = status.as_u16(), "Session callback rejected by chat service");
                }
                Err(e) => {
                    error!(session_id = %session_id, error = %e, "Session callback failed");
                }
            }
            result
        })
    }
}
