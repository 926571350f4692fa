//! Ordered, append-only message store for one conversation

use super::message::{Message, Role};

/// The visible conversation
///
/// Insertion order is display order. Messages can only be appended or
/// discarded all at once.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the end
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Discards every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages written by `role`
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role() == role).count()
    }
}
