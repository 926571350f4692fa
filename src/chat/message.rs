//! Transcript message records

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed by the user
    User,
    /// Reply shown on behalf of the model
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the chat transcript
///
/// Messages are immutable once created; the fields are only readable.
/// The id is a ULID, so ids sort by creation time.
///
/// # Examples
///
/// ```
/// use zenmedic::chat::{Message, Role};
///
/// let msg = Message::user("I have a headache");
/// assert_eq!(msg.role(), Role::User);
/// assert_eq!(msg.content(), "I have a headache");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: String,
    content: String,
    role: Role,
    timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    /// Creates a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Unique id assigned at creation
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Text exactly as typed or as returned by the model
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Author of the message
    pub fn role(&self) -> Role {
        self.role
    }

    /// Creation instant
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Creation time in local `HH:MM` form, for display
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}
