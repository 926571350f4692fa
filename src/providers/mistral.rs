//! Mistral chat completions provider
//!
//! Sends the medical prompt to an OpenAI-style `chat/completions` endpoint
//! and extracts `choices[0].message.content` from the reply.

use crate::config::CompletionConfig;
use crate::error::{Result, ZenmedicError};
use crate::prompts::build_medical_prompt;
use crate::providers::Provider;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Mistral API provider
///
/// # Examples
///
/// ```no_run
/// use zenmedic::config::CompletionConfig;
/// use zenmedic::providers::{MistralProvider, Provider};
///
/// # async fn example() -> zenmedic::error::Result<()> {
/// let config = CompletionConfig {
///     api_key: Some("sk-test".to_string()),
///     ..Default::default()
/// };
/// let provider = MistralProvider::new(config)?;
/// let reply = provider.complete("I have a headache").await?;
/// # Ok(())
/// # }
/// ```
pub struct MistralProvider {
    client: Client,
    config: CompletionConfig,
}

/// Request body for the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

/// Response body from the completions endpoint
#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl MistralProvider {
    /// Create a new provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use zenmedic::config::CompletionConfig;
    /// use zenmedic::providers::MistralProvider;
    ///
    /// let provider = MistralProvider::new(CompletionConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("zenmedic/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ZenmedicError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Mistral provider: url={}, model={}",
            config.api_url,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured endpoint URL
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    fn build_request(&self, user_text: &str) -> CompletionRequest<'_> {
        CompletionRequest {
            model: &self.config.model,
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: build_medical_prompt(user_text),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    fn extract_reply(body: CompletionBody) -> Result<String> {
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ZenmedicError::MalformedResponse(
                    "response has no choices[0].message.content".to_string(),
                )
                .into()
            })
    }
}

#[async_trait]
impl Provider for MistralProvider {
    async fn complete(&self, user_text: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ZenmedicError::MissingCredentials("mistral".to_string()))?;

        let request = self.build_request(user_text);

        tracing::debug!(
            "Sending completion request: model={}, prompt_chars={}",
            request.model,
            request.messages[0].content.len()
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                ZenmedicError::Completion(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Completion endpoint returned {}: {}", status, error_text);
            return Err(ZenmedicError::CompletionStatus {
                status: status.as_u16(),
                body: error_text,
            }
            .into());
        }

        let body: CompletionBody = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            ZenmedicError::MalformedResponse(e.to_string())
        })?;

        let reply = Self::extract_reply(body)?;
        tracing::debug!("Completion reply: {} chars", reply.len());
        Ok(reply)
    }

    fn current_model(&self) -> Option<String> {
        Some(self.config.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MistralProvider {
        MistralProvider::new(CompletionConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let request = provider.build_request("I have a headache");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "mistral-tiny");
        assert_eq!(json["temperature"].as_f64().unwrap() as f32, 0.9);
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("User: I have a headache\nAssistant:"));
    }

    #[test]
    fn test_extract_reply_first_choice() {
        let body: CompletionBody = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Rest."}},{"message":{"content":"Other"}}]}"#,
        )
        .unwrap();
        assert_eq!(MistralProvider::extract_reply(body).unwrap(), "Rest.");
    }

    #[test]
    fn test_extract_reply_empty_choices_is_malformed() {
        let body: CompletionBody = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        let err = MistralProvider::extract_reply(body).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ZenmedicError>(),
            Some(ZenmedicError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_reply_missing_content_is_malformed() {
        let body: CompletionBody =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(MistralProvider::extract_reply(body).is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_a_call_failure() {
        let provider = MistralProvider::new(CompletionConfig::default()).unwrap();
        let err = provider.complete("hi").await.unwrap_err();
        let typed = err.downcast_ref::<ZenmedicError>().unwrap();
        assert!(matches!(typed, ZenmedicError::MissingCredentials(_)));
        assert!(!typed.is_completion_failure());
    }

    #[test]
    fn test_current_model() {
        assert_eq!(provider().current_model(), Some("mistral-tiny".to_string()));
    }
}
