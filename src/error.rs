//! Error types for ZenMedic
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for ZenMedic operations
///
/// Covers configuration loading, the completion call, the hosted user
/// backend, and credential validation. Completion failures are split into
/// transport, status and shape variants so callers can decide whether to
/// fold them into displayable text.
#[derive(Error, Debug)]
pub enum ZenmedicError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The completion request could not be sent or timed out
    #[error("Completion request failed: {0}")]
    Completion(String),

    /// The completion endpoint answered with a non-success status
    #[error("Completion endpoint returned {status}: {body}")]
    CompletionStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The completion endpoint answered with an unexpected body shape
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// No API key available for the completion endpoint
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// The user backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Credential form validation failed
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A user identifier is required but none was supplied
    #[error("No user id supplied; log in first or pass --user-id")]
    MissingUserId,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl ZenmedicError {
    /// Returns true for failures of the completion call itself
    ///
    /// These are the errors the completion client folds into the reply text.
    /// Anything else (missing credentials, configuration) is not a call
    /// failure and is left to the caller.
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            Self::Completion(_)
                | Self::CompletionStatus { .. }
                | Self::MalformedResponse(_)
                | Self::Http(_)
        )
    }
}

/// Result type alias for ZenMedic operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
