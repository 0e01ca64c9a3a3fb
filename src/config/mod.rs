//! Configuration Management Module
//!
//! This module handles loading and validating configuration for the mock API service.
//! Values come from an optional dotenv-style file and the process environment, with
//! the environment taking precedence. Configuration is loaded once at startup and
//! handed to the API server; handlers never read the environment themselves.

use anyhow::Context;
use ::config::{Environment, File, FileFormat, Source};
use serde::{Deserialize, Serialize};

/// Environment variable naming the dotenv-style file to load.
pub const ENV_FILE_VAR: &str = "MOCK_API_ENV_FILE";

/// File loaded when no explicit path is given. It may be absent.
pub const DEFAULT_ENV_FILE: &str = ".env";

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
///
/// Keys from both sources are folded to lowercase, so `API_KEY` in the
/// environment or the env file populates `api_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared secret expected in the `X-API-KEY` header of protected routes
    pub api_key: String,
    /// Base URL of the chat service receiving deferred session callbacks
    pub chat_url: String,
    /// Port number to bind the API server to
    pub port: u16,
    /// Host address to bind the API server to
    #[serde(default = "default_listen_host")]
    pub listen_host: String,
    /// Delay before a scheduled session callback fires, in milliseconds
    #[serde(default = "default_notify_delay_ms")]
    pub notify_delay_ms: u64,
    /// Timeout applied to each session callback request, in milliseconds
    #[serde(default = "default_notify_timeout_ms")]
    pub notify_timeout_ms: u64,
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_notify_delay_ms() -> u64 {
    5_000
}

fn default_notify_timeout_ms() -> u64 {
    10_000
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates the loaded values.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is usable
    /// - `Err(anyhow::Error)` - Blank API key, bad callback URL or bad listen address
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("Configuration error: API_KEY must not be blank");
        }

        let chat_url = url::Url::parse(&self.chat_url)
            .with_context(|| format!("Configuration error: invalid CHAT_URL '{}'", self.chat_url))?;
        if !matches!(chat_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Configuration error: CHAT_URL must use http or https, got '{}'",
                chat_url.scheme()
            );
        }
        if chat_url.cannot_be_a_base() {
            anyhow::bail!("Configuration error: CHAT_URL '{}' cannot be used as a base URL", self.chat_url);
        }

        self.listen_addr()?;

        Ok(())
    }

    /// Resolves the socket address the server binds to.
    pub fn listen_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.listen_host, self.port)
            .parse()
            .with_context(|| {
                format!(
                    "Configuration error: invalid listen address {}:{}",
                    self.listen_host, self.port
                )
            })
    }

    /// Loads configuration from the env file and the process environment.
    ///
    /// The env file path comes from `MOCK_API_ENV_FILE` when set, in which case the
    /// file must exist. Otherwise `.env` is read if present.
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - A source could not be read, a required key is missing,
    ///   or validation failed
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var(ENV_FILE_VAR) {
            Ok(path) => Self::load_from(&path, true, Environment::default()),
            Err(_) => Self::load_from(DEFAULT_ENV_FILE, false, Environment::default()),
        }
    }

    /// Loads configuration from an explicit env file and environment source.
    ///
    /// # Arguments
    ///
    /// * `env_file` - Path of a `KEY=value` file
    /// * `required` - Whether a missing file is an error
    /// * `environment` - Environment source layered over the file
    pub fn load_from(env_file: &str, required: bool, environment: Environment) -> anyhow::Result<Self> {
        if required && !std::path::Path::new(env_file).exists() {
            anyhow::bail!("Configuration file '{}' not found", env_file);
        }

        // The INI source keeps keys as written; the environment source lowercases them.
        let file_values = ::config::Config::builder()
            .add_source(File::new(env_file, FileFormat::Ini).required(required))
            .build()
            .and_then(|file| file.collect())
            .with_context(|| format!("Failed to read configuration file '{}'", env_file))?;

        let mut builder = ::config::Config::builder();
        for (key, value) in file_values {
            builder = builder
                .set_default(key.to_lowercase(), value)
                .with_context(|| format!("Invalid key '{}' in '{}'", key, env_file))?;
        }

        let settings = builder
            .add_source(environment)
            .build()
            .context("Failed to read configuration from the environment")?;

        let config: Config = settings
            .try_deserialize()
            .context("Configuration error: missing or invalid API_KEY, CHAT_URL or PORT")?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    /// Creates a configuration suitable for local development and tests.
    fn default() -> Self {
        Self {
            api_key: "dev-api-key".to_string(),
            chat_url: "http://127.0.0.1:8081".to_string(),
            port: 8080,
            listen_host: default_listen_host(),
            notify_delay_ms: default_notify_delay_ms(),
            notify_timeout_ms: default_notify_timeout_ms(),
        }
    }
}
