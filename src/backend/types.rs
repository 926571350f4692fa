//! Wire types for the user backend API

use serde::{Deserialize, Serialize};

/// Body of the history sync `PUT`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryUpdate {
    /// The raw submitted text
    pub data: String,
}

/// Stored prompts for a user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryResponse {
    /// Past prompts, oldest first
    #[serde(default)]
    pub history: Vec<String>,
}

/// Account details for a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDetails {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
}

/// Wrapper returned by the user details endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsResponse {
    /// The user's details
    pub user_details: UserDetails,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Signup request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Response of the login and signup endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Identifier used for all per-user endpoints
    pub user_id: String,
}

/// Profile view assembled from the history and details endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Number of stored prompts
    pub total_chats: usize,
    /// Stored prompts, oldest first
    pub history: Vec<String>,
}
