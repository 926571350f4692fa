//! Test doubles for ZenMedic
//!
//! Providers and history stores that answer without any network access,
//! so the chat pipeline can be exercised in unit tests.

use crate::backend::HistorySync;
use crate::error::{Result, ZenmedicError};
use crate::providers::Provider;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Provider that always returns the same reply and records each input
pub struct StaticProvider {
    reply: String,
    calls: Mutex<Vec<String>>,
}

impl StaticProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Inputs received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for StaticProvider {
    async fn complete(&self, user_text: &str) -> Result<String> {
        self.calls.lock().unwrap().push(user_text.to_string());
        Ok(self.reply.clone())
    }

    fn current_model(&self) -> Option<String> {
        Some("static".to_string())
    }
}

/// Provider whose call always fails as if the network were down
pub struct RejectingProvider;

#[async_trait]
impl Provider for RejectingProvider {
    async fn complete(&self, _user_text: &str) -> Result<String> {
        Err(ZenmedicError::Completion("network error".to_string()).into())
    }
}

/// Provider that blocks until the test releases it
///
/// `wait_started` resolves once a call has begun; `release` lets the
/// pending call return its reply.
pub struct GatedProvider {
    reply: String,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl GatedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl Provider for GatedProvider {
    async fn complete(&self, _user_text: &str) -> Result<String> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

/// History store that records every call, optionally failing each one
pub struct RecordingSync {
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingSync {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A store that records the call and then reports failure
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// `(user_id, text)` pairs received so far, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistorySync for RecordingSync {
    async fn sync(&self, user_id: &str, text: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((user_id.to_string(), text.to_string()));
        if self.fail {
            Err(ZenmedicError::Backend {
                status: 500,
                body: "history store unavailable".to_string(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}
