//! HTTP client for the hosted user backend
//!
//! Every endpoint lives under `{base_url}/api/users/{provider}`. History
//! sync is best-effort: callers go through [`HistorySync`], whose failures
//! are logged by the chat session and never shown to the user.

use crate::backend::types::{
    AuthResponse, HistoryResponse, HistoryUpdate, LoginRequest, Profile, SignupRequest,
    UserDetails, UserDetailsResponse,
};
use crate::config::BackendConfig;
use crate::error::{Result, ZenmedicError};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Forwards submitted user text to a remote history store
///
/// No message id or timestamp is sent, so the store cannot deduplicate:
/// calling `sync` twice for the same text stores it twice.
#[async_trait]
pub trait HistorySync: Send + Sync {
    /// Store `text` in the history of `user_id`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it
    async fn sync(&self, user_id: &str, text: &str) -> Result<()>;
}

/// Client for the user, history and auth endpoints
///
/// # Examples
///
/// ```
/// use zenmedic::backend::BackendClient;
/// use zenmedic::config::BackendConfig;
///
/// let client = BackendClient::new(BackendConfig::default()).unwrap();
/// assert_eq!(
///     client.users_url(&["login"]).unwrap().as_str(),
///     "https://zengpt-api.vercel.app/api/users/zengpt/login"
/// );
/// ```
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("zenmedic/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ZenmedicError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(
            "Initialized backend client: base_url={}, provider={}",
            config.base_url,
            config.provider
        );

        Ok(Self { client, config })
    }

    /// Build `{base_url}/api/users/{provider}/{segments...}`
    ///
    /// Each segment is percent-encoded, so a user id containing `/`, `?`
    /// or `#` stays a single path segment.
    ///
    /// # Errors
    ///
    /// Returns `ZenmedicError::Validation` for an empty, `.` or `..`
    /// segment, and `ZenmedicError::Config` if the base URL cannot carry a
    /// path
    pub fn users_url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ZenmedicError::Validation(vec![format!(
                "Invalid user id or path segment: '{}'",
                bad
            )])
            .into());
        }

        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ZenmedicError::Config(format!("Invalid backend.base_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                ZenmedicError::Config(format!(
                    "backend.base_url cannot be a base: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["api", "users", self.config.provider.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Store one prompt in the user's history
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status
    pub async fn sync_history(&self, user_id: &str, text: &str) -> Result<()> {
        let url = self.users_url(&[user_id])?;
        tracing::debug!("Syncing prompt to history: user_id={}", user_id);

        let response = self
            .client
            .put(url)
            .json(&HistoryUpdate {
                data: text.to_string(),
            })
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// Fetch the user's stored prompts
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a bad body
    pub async fn fetch_history(&self, user_id: &str) -> Result<Vec<String>> {
        let url = self.users_url(&[user_id])?;
        let response: HistoryResponse = self.get_json(url).await?;
        Ok(response.history)
    }

    /// Fetch the user's name and email
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a bad body
    pub async fn user_details(&self, user_id: &str) -> Result<UserDetails> {
        let url = self.users_url(&["user", "details", user_id])?;
        let response: UserDetailsResponse = self.get_json(url).await?;
        Ok(response.user_details)
    }

    /// Fetch history and details and assemble the profile view
    ///
    /// # Errors
    ///
    /// Returns error if either request fails
    pub async fn profile(&self, user_id: &str) -> Result<Profile> {
        let (history, details) =
            tokio::try_join!(self.fetch_history(user_id), self.user_details(user_id))?;

        Ok(Profile {
            name: details.name,
            email: details.email,
            total_chats: history.len(),
            history,
        })
    }

    /// Permanently delete the user's account
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status
    pub async fn delete_account(&self, user_id: &str) -> Result<()> {
        let url = self.users_url(&["delete", "account", user_id])?;
        tracing::info!("Deleting account: user_id={}", user_id);

        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Log in and return the user id
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a bad body
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = self.users_url(&["login"])?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.client.post(url).json(&body).send().await?;
        let auth: AuthResponse = Self::parse_json(response).await?;
        tracing::info!("Logged in: user_id={}", auth.user_id);
        Ok(auth.user_id)
    }

    /// Create an account and return the new user id
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a bad body
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let url = self.users_url(&["signup"])?;
        let body = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.client.post(url).json(&body).send().await?;
        let auth: AuthResponse = Self::parse_json(response).await?;
        tracing::info!("Signed up: user_id={}", auth.user_id);
        Ok(auth.user_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;
        Self::parse_json(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("Backend returned {}: {}", status, body);
        Err(ZenmedicError::Backend {
            status: status.as_u16(),
            body,
        }
        .into())
    }
}

#[async_trait]
impl HistorySync for BackendClient {
    async fn sync(&self, user_id: &str, text: &str) -> Result<()> {
        self.sync_history(user_id, text).await
    }
}
