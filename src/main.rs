//! Mock Enrollment API Service
//!
//! A mock HTTP API for enrollment front-ends. It serves fixture offers and
//! guardian/student records, stubs out login, and calls a chat service back a few
//! seconds after a session notification.
//!
//! ## Overview
//!
//! The service:
//! 1. Loads API key, chat URL and port from `.env` and the process environment
//! 2. Serves `POST /api/auth` publicly
//! 3. Serves `/api/v1/...` behind the `X-API-KEY` header
//! 4. Fires one delayed `POST {CHAT_URL}/{sessionId}` per notification

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mock_api::config::ENV_FILE_VAR;
use mock_api::{ApiServer, Config};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration (failing fast if anything required is missing)
/// 3. Starts the API server and runs it until Ctrl-C
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Mock Enrollment API");
        println!();
        println!("Usage: mock-api [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --env-file <path>  Load settings from this file (must exist)");
        println!("  --help, -h         Show this help message");
        println!();
        println!("Environment variables:");
        println!("  API_KEY            Shared secret expected in X-API-KEY (required)");
        println!("  CHAT_URL           Base URL for session callbacks (required)");
        println!("  PORT               Listen port (required)");
        println!("  LISTEN_HOST        Listen address (default 0.0.0.0)");
        println!("  NOTIFY_DELAY_MS    Callback delay in milliseconds (default 5000)");
        println!("  NOTIFY_TIMEOUT_MS  Callback request timeout in milliseconds (default 10000)");
        println!("  {}  Settings file path (overridden by --env-file)", ENV_FILE_VAR);
        return Ok(());
    }

    if let Some(i) = args.iter().position(|arg| arg == "--env-file") {
        let path = args
            .get(i + 1)
            .ok_or_else(|| anyhow::anyhow!("--env-file requires a path"))?;
        std::env::set_var(ENV_FILE_VAR, path);
        info!("Using env file: {}", path);
    }

    info!("Starting Mock Enrollment API");

    let config = Config::load()?;
    info!("Configuration loaded successfully");

    let api_server = ApiServer::new(config)?;
    api_server.run().await?;

    Ok(())
}
