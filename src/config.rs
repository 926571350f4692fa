//! Configuration management for ZenMedic
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ZenmedicError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for ZenMedic
///
/// Holds the completion endpoint settings, the hosted user backend
/// settings, and chat session behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion endpoint configuration
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Hosted user/history backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
    /// Chat session behavior
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Completion endpoint configuration
///
/// The request body is `{model, messages, temperature, max_tokens}` and the
/// API key is sent as a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Full URL of the chat completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token for the completion endpoint
    ///
    /// Usually supplied through `ZENMEDIC_API_KEY` or `MISTRAL_API_KEY`
    /// rather than written into the config file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output length in tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Client-side request timeout (seconds)
    #[serde(default = "default_completion_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_url() -> String {
    "https://api.mistral.ai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "mistral-tiny".to_string()
}

fn default_temperature() -> f32 {
    0.9
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_completion_timeout() -> u64 {
    60
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_completion_timeout(),
        }
    }
}

/// Hosted user backend configuration
///
/// Endpoints are built as `{base_url}/api/users/{provider}/...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the user API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Provider path segment identifying this application
    #[serde(default = "default_backend_provider")]
    pub provider: String,

    /// Request timeout (seconds)
    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u64,
}

fn default_backend_url() -> String {
    "https://zengpt-api.vercel.app".to_string()
}

fn default_backend_provider() -> String {
    "zengpt".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            provider: default_backend_provider(),
            timeout_seconds: default_backend_timeout(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Render completion call failures as apology text instead of the
    /// generic fallback sentence
    #[serde(default = "default_fold_errors")]
    pub fold_errors: bool,

    /// User id used for history sync when none is given on the command line
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_fold_errors() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            fold_errors: default_fold_errors(),
            user_id: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ZenmedicError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ZenmedicError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // Vendor variables first so the ZENMEDIC_* ones win
        if let Ok(api_url) = std::env::var("MISTRAL_API_URL") {
            self.completion.api_url = api_url;
        }

        if let Ok(api_key) = std::env::var("MISTRAL_API_KEY") {
            self.completion.api_key = Some(api_key);
        }

        if let Ok(api_url) = std::env::var("ZENMEDIC_API_URL") {
            self.completion.api_url = api_url;
        }

        if let Ok(api_key) = std::env::var("ZENMEDIC_API_KEY") {
            self.completion.api_key = Some(api_key);
        }

        if let Ok(model) = std::env::var("ZENMEDIC_MODEL") {
            self.completion.model = model;
        }

        if let Ok(temperature) = std::env::var("ZENMEDIC_TEMPERATURE") {
            if let Ok(value) = temperature.parse() {
                self.completion.temperature = value;
            } else {
                tracing::warn!("Invalid ZENMEDIC_TEMPERATURE: {}", temperature);
            }
        }

        if let Ok(max_tokens) = std::env::var("ZENMEDIC_MAX_TOKENS") {
            if let Ok(value) = max_tokens.parse() {
                self.completion.max_tokens = value;
            } else {
                tracing::warn!("Invalid ZENMEDIC_MAX_TOKENS: {}", max_tokens);
            }
        }

        if let Ok(timeout) = std::env::var("ZENMEDIC_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.completion.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid ZENMEDIC_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(base_url) = std::env::var("ZENMEDIC_BACKEND_URL") {
            self.backend.base_url = base_url;
        }

        if let Ok(provider) = std::env::var("ZENMEDIC_BACKEND_PROVIDER") {
            self.backend.provider = provider;
        }

        if let Ok(user_id) = std::env::var("ZENMEDIC_USER_ID") {
            self.chat.user_id = Some(user_id);
        }

        if let Ok(fold) = std::env::var("ZENMEDIC_FOLD_ERRORS") {
            match fold.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.chat.fold_errors = true,
                "0" | "false" | "no" => self.chat.fold_errors = false,
                _ => tracing::warn!("Invalid ZENMEDIC_FOLD_ERRORS: {}", fold),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(model) = &cli.model {
            self.completion.model = model.clone();
        }

        if let Some(backend_url) = &cli.backend_url {
            self.backend.base_url = backend_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ZenmedicError::Config` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        validate_http_url("completion.api_url", &self.completion.api_url)?;

        if self.completion.model.trim().is_empty() {
            return Err(
                ZenmedicError::Config("completion.model cannot be empty".to_string()).into(),
            );
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(ZenmedicError::Config(
                "completion.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.completion.max_tokens == 0 {
            return Err(ZenmedicError::Config(
                "completion.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.completion.timeout_seconds == 0 {
            return Err(ZenmedicError::Config(
                "completion.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        validate_http_url("backend.base_url", &self.backend.base_url)?;

        if self.backend.provider.is_empty() || self.backend.provider.contains('/') {
            return Err(ZenmedicError::Config(
                "backend.provider must be a single non-empty path segment".to_string(),
            )
            .into());
        }

        if self.backend.timeout_seconds == 0 {
            return Err(ZenmedicError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| ZenmedicError::Config(format!("{} is not a valid URL: {}", field, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ZenmedicError::Config(format!(
            "{} must use http or https, got {}",
            field, other
        ))
        .into()),
    }
}
