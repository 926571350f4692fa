//! Provider module for ZenMedic
//!
//! This module contains the completion provider abstraction, the Mistral
//! implementation, and the wrapper that folds call failures into reply text.

pub mod base;
pub mod mistral;

pub use base::{FoldingProvider, Provider, APOLOGY_PREFIX};
pub use mistral::MistralProvider;

use crate::config::Config;
use crate::error::Result;

/// Create the completion provider described by the configuration
///
/// The Mistral provider is wrapped in a [`FoldingProvider`] unless
/// `chat.fold_errors` is false.
///
/// # Errors
///
/// Returns error if the HTTP client cannot be initialized
///
/// # Examples
///
/// ```
/// use zenmedic::config::Config;
/// use zenmedic::providers::create_provider;
///
/// let provider = create_provider(&Config::default()).unwrap();
/// assert_eq!(provider.current_model(), Some("mistral-tiny".to_string()));
/// ```
pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let provider: Box<dyn Provider> = Box::new(MistralProvider::new(config.completion.clone())?);

    if config.chat.fold_errors {
        Ok(Box::new(FoldingProvider::new(provider)))
    } else {
        tracing::debug!("Error folding disabled; completion failures use the fallback reply");
        Ok(provider)
    }
}
