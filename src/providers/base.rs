//! Base provider trait and the error-folding wrapper
//!
//! A provider turns the user's raw text into the model's reply. Providers
//! report failures as typed errors; [`FoldingProvider`] is the boundary that
//! turns failures of the completion call into ordinary reply text.

use crate::error::{Result, ZenmedicError};
use async_trait::async_trait;

/// Prefix of the reply text produced for a folded completion failure
pub const APOLOGY_PREFIX: &str =
    "Sorry, something went wrong while getting a response from Mistral.";

/// Completion provider trait
///
/// Implementors send one request per call: no retries, no history.
///
/// # Examples
///
/// ```
/// use zenmedic::providers::Provider;
/// use zenmedic::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(&self, user_text: &str) -> Result<String> {
///         Ok(format!("You said: {}", user_text))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Sends `user_text` to the model and returns its reply
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the endpoint answers with a
    /// non-success status, or the reply cannot be extracted
    async fn complete(&self, user_text: &str) -> Result<String>;

    /// Model identifier used for requests, if the provider has one
    fn current_model(&self) -> Option<String> {
        None
    }
}

/// Provider wrapper that renders completion failures as reply text
///
/// Transport failures, non-success statuses and malformed bodies become
/// `"Sorry, something went wrong while getting a response from Mistral. <detail>"`.
/// Any other error (missing credentials, for instance) is passed through so
/// the caller can treat it as a hard failure.
pub struct FoldingProvider {
    inner: Box<dyn Provider>,
}

impl FoldingProvider {
    /// Wraps a provider
    pub fn new(inner: Box<dyn Provider>) -> Self {
        Self { inner }
    }

    /// Formats the reply text shown for a folded failure
    ///
    /// # Examples
    ///
    /// ```
    /// use zenmedic::providers::FoldingProvider;
    ///
    /// let text = FoldingProvider::apology("connection reset");
    /// assert!(text.starts_with("Sorry, something went wrong"));
    /// assert!(text.ends_with("connection reset"));
    /// ```
    pub fn apology(detail: impl std::fmt::Display) -> String {
        format!("{} {}", APOLOGY_PREFIX, detail)
    }
}

#[async_trait]
impl Provider for FoldingProvider {
    async fn complete(&self, user_text: &str) -> Result<String> {
        match self.inner.complete(user_text).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                let folded = err
                    .downcast_ref::<ZenmedicError>()
                    .is_some_and(ZenmedicError::is_completion_failure);
                if folded {
                    tracing::warn!("Completion failed, replying with apology: {}", err);
                    Ok(Self::apology(&err))
                } else {
                    Err(err)
                }
            }
        }
    }

    fn current_model(&self) -> Option<String> {
        self.inner.current_model()
    }
}
