//! Test module organization
//!
//! This module re-exports test helpers for use in test files.

mod helpers;

#[allow(unused_imports)]
pub use helpers::{
    build_test_config, build_test_server, setup_mock_chat_server, unreachable_url,
    wait_for_requests, write_env_file, DUMMY_API_KEY, DUMMY_CPF, DUMMY_DOC, DUMMY_SESSION_ID,
    NEVER_DELAY_MS, SHORT_DELAY_MS,
};
