//! Unit tests for the deferred session notifier
//!
//! These tests exercise URL building, immediate delivery and scheduled delivery
//! against a wiremock chat server.

use std::time::{Duration, Instant};

use mock_api::notifier::{NotifyError, SessionNotifier};
use warp::http::StatusCode;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "mod.rs"]
mod test_helpers;
use test_helpers::{build_test_config, unreachable_url, wait_for_requests, DUMMY_SESSION_ID};

fn notifier_for(chat_url: &str, delay_ms: u64) -> SessionNotifier {
    SessionNotifier::new(&build_test_config(chat_url, delay_ms)).unwrap()
}

// ============================================================================
// CALLBACK URL TESTS
// ============================================================================

/// What is tested: Session id appended to a bare host URL
/// Why: The callback target is `{chat_url}/{sessionId}`
#[test]
fn test_callback_url_bare_host() {
    let notifier = notifier_for("http://127.0.0.1:8081", 5_000);

    let url = notifier.callback_url(DUMMY_SESSION_ID).unwrap();

    assert_eq!(url.as_str(), "http://127.0.0.1:8081/abc");
}

/// What is tested: Base URLs with a path, with and without trailing slash
/// Why: A trailing slash must not produce `//` in the target
#[test]
fn test_callback_url_with_base_path() {
    for base in ["http://chat.example.com/sessions", "http://chat.example.com/sessions/"] {
        let notifier = notifier_for(base, 5_000);

        let url = notifier.callback_url(DUMMY_SESSION_ID).unwrap();

        assert_eq!(url.as_str(), "http://chat.example.com/sessions/abc", "base: {}", base);
    }
}

/// What is tested: Session ids with URL metacharacters
/// Why: The id is a single path segment and cannot alter path or query
#[test]
fn test_callback_url_encodes_session_id() {
    let notifier = notifier_for("http://chat.example.com/sessions", 5_000);

    let url = notifier.callback_url("a/b?c#d").unwrap();

    assert_eq!(url.path(), "/sessions/a%2Fb%3Fc%23d");
    assert!(url.query().is_none());
    assert!(url.fragment().is_none());
}

/// What is tested: Notifier construction with an unusable URL
/// Why: Bad configuration must fail at startup
#[test]
fn test_new_rejects_invalid_url() {
    let config = build_test_config("not a url", 5_000);

    assert!(SessionNotifier::new(&config).is_err());
}

/// What is tested: Configured delay is exposed
/// Why: Handlers log the delay of each scheduled callback
#[test]
fn test_delay_from_config() {
    let notifier = notifier_for("http://127.0.0.1:8081", 1_234);

    assert_eq!(notifier.delay(), Duration::from_millis(1_234));
}

// ============================================================================
// DELIVERY TESTS
// ============================================================================

/// What is tested: Immediate delivery request shape
/// Why: The chat service expects an empty POST with a JSON content type
#[tokio::test]
async fn test_deliver_posts_empty_json_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/abc"))
        .and(header("content-type", "application/json"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = notifier_for(&mock_server.uri(), 5_000);
    let status = notifier.deliver(DUMMY_SESSION_ID).await.unwrap();

    assert_eq!(status, StatusCode::NO_CONTENT);
}

/// What is tested: Error statuses from the chat service
/// Why: Any HTTP answer counts as delivered; the status is only logged
#[tokio::test]
async fn test_deliver_returns_error_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = notifier_for(&mock_server.uri(), 5_000);
    let status = notifier.deliver(DUMMY_SESSION_ID).await.unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

/// What is tested: Connection failure
/// Why: Transport errors are reported as `NotifyError::Request`
#[tokio::test]
async fn test_deliver_unreachable_host() {
    let notifier = notifier_for(&unreachable_url(), 5_000);

    let result = notifier.deliver(DUMMY_SESSION_ID).await;

    assert!(matches!(result, Err(NotifyError::Request(_))));
}

/// What is tested: Slow chat service
/// Why: The callback request must not hang forever
#[tokio::test]
async fn test_deliver_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let mut config = build_test_config(&mock_server.uri(), 5_000);
    config.notify_timeout_ms = 100;
    let notifier = SessionNotifier::new(&config).unwrap();

    let result = notifier.deliver(DUMMY_SESSION_ID).await;

    match result {
        Err(NotifyError::Request(e)) => assert!(e.is_timeout(), "expected timeout, got {}", e),
        other => panic!("expected timeout error, got {:?}", other),
    }
}

// ============================================================================
// SCHEDULING TESTS
// ============================================================================

/// What is tested: Scheduled callback waits for the delay and fires once
/// Why: The callback is a one-shot deferred task
#[tokio::test]
async fn test_schedule_fires_once_after_delay() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = notifier_for(&mock_server.uri(), 300);
    let started = Instant::now();
    let handle = notifier.schedule(DUMMY_SESSION_ID.to_string());

    // Nothing is sent before the delay
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(mock_server.received_requests().await.unwrap().is_empty());

    let status = handle.await.unwrap().unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(wait_for_requests(&mock_server, 1, Duration::from_secs(1)).await.len(), 1);
}

/// What is tested: Scheduled callback to an unreachable host
/// Why: Failures are reported through the task result, never panics
#[tokio::test]
async fn test_schedule_reports_failure() {
    let notifier = notifier_for(&unreachable_url(), 10);

    let result = notifier.schedule(DUMMY_SESSION_ID.to_string()).await.unwrap();

    assert!(result.is_err());
}

/// What is tested: Independent callbacks for concurrent sessions
/// Why: Each accepted notification produces its own call
#[tokio::test]
async fn test_schedule_multiple_sessions() {
    let mock_server = MockServer::start().await;
    for session in ["s1", "s2", "s3"] {
        Mock::given(method("POST"))
            .and(path(format!("/{}", session)))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let notifier = notifier_for(&mock_server.uri(), 50);
    let handles: Vec<_> = ["s1", "s2", "s3"]
        .iter()
        .map(|session| notifier.schedule(session.to_string()))
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), StatusCode::OK);
    }
}
