//! Shared test helpers for integration tests
//!
//! The module is organized into several categories:
//! - **Constants**: dummy keys, session ids and tax ids
//! - **Configuration Builders**: test configurations pointing at a mock chat server
//! - **Mock Chat Server**: wiremock setup and polling for received callbacks
//! - **Env Files**: temporary dotenv-style files for config loading tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use mock_api::api::ApiServer;
use mock_api::config::Config;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// ============================================================================
// CONSTANTS
// ============================================================================

/// API key configured on test servers
pub const DUMMY_API_KEY: &str = "test-api-key";

/// Session id used for notification tests
pub const DUMMY_SESSION_ID: &str = "abc";

/// Tax id used for login tests
pub const DUMMY_CPF: &str = "123.456.789-12";

/// Document used for lookup tests
pub const DUMMY_DOC: &str = "123";

/// Delay long enough that a callback can never fire during a test
pub const NEVER_DELAY_MS: u64 = 60_000;

/// Delay short enough that a callback fires promptly during a test
pub const SHORT_DELAY_MS: u64 = 100;

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Build a test config whose callbacks go to `chat_url` after `notify_delay_ms`.
pub fn build_test_config(chat_url: &str, notify_delay_ms: u64) -> Config {
    Config {
        api_key: DUMMY_API_KEY.to_string(),
        chat_url: chat_url.to_string(),
        port: 0,
        listen_host: "127.0.0.1".to_string(),
        notify_delay_ms,
        notify_timeout_ms: 2_000,
    }
}

/// Build an API server whose callbacks go to `chat_url` after `notify_delay_ms`.
pub fn build_test_server(chat_url: &str, notify_delay_ms: u64) -> ApiServer {
    ApiServer::new(build_test_config(chat_url, notify_delay_ms)).unwrap()
}

// ============================================================================
// MOCK CHAT SERVER
// ============================================================================

/// Start a chat server mock answering 200 to any POST, expecting `expected_calls`.
///
/// The expectation is verified when the returned server is dropped.
pub async fn setup_mock_chat_server(expected_calls: u64) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(expected_calls)
        .mount(&mock_server)
        .await;
    mock_server
}

/// Poll the mock server until it has received `count` requests or `timeout` elapses.
pub async fn wait_for_requests(mock_server: &MockServer, count: usize, timeout: Duration) -> Vec<Request> {
    let deadline = Instant::now() + timeout;
    loop {
        let received = mock_server.received_requests().await.unwrap_or_default();
        if received.len() >= count || Instant::now() >= deadline {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Returns an http URL on a local port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

// ============================================================================
// ENV FILES
// ============================================================================

/// Write `contents` to a uniquely named file in the temp directory.
pub fn write_env_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("mock_api_{}_{}.env", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}
