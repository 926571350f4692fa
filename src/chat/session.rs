//! Chat session: the submission handler and "new conversation"
//!
//! A session owns the transcript and drives one submission at a time:
//!
//! 1. append the user's message
//! 2. call the completion provider and, concurrently, forward the text to
//!    the history store
//! 3. append exactly one assistant message (the reply, or a fixed fallback
//!    sentence if the provider returned an error)
//!
//! Starting a new conversation bumps a generation counter and cancels the
//! in-flight completion. A reply that belongs to an older generation is
//! dropped instead of landing in the fresh transcript.

use super::message::Message;
use super::transcript::Transcript;
use crate::backend::HistorySync;
use crate::providers::Provider;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reply shown when the completion provider fails outright
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't process your request. Please try again.";

/// Why a submission was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Input was empty or whitespace only
    Empty,
    /// Another submission is still waiting for its reply
    InFlight,
}

/// Result of [`ChatSession::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended
    Rejected(RejectReason),
    /// The assistant message that was appended
    Replied(Message),
    /// The conversation was reset while waiting; the reply was dropped
    Discarded,
}

struct SessionState {
    transcript: Transcript,
    generation: u64,
    welcome: bool,
    cancel: CancellationToken,
}

/// Clears the in-flight flag when the submission ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One user's chat session
///
/// All methods take `&self`, so a session can be shared behind an `Arc`
/// between the input loop and a task awaiting a reply.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use zenmedic::chat::{ChatSession, SubmitOutcome};
/// use zenmedic::providers::Provider;
///
/// struct Canned;
///
/// #[async_trait]
/// impl Provider for Canned {
///     async fn complete(&self, _text: &str) -> zenmedic::error::Result<String> {
///         Ok("Try resting and hydrating.".to_string())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let session = ChatSession::new(Arc::new(Canned));
/// let outcome = session.submit("I have a headache").await;
/// assert!(matches!(outcome, SubmitOutcome::Replied(_)));
/// assert_eq!(session.len(), 2);
/// # });
/// ```
pub struct ChatSession {
    provider: Arc<dyn Provider>,
    history: Option<Arc<dyn HistorySync>>,
    user_id: Option<String>,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl ChatSession {
    /// Creates a session that does not forward prompts anywhere
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            history: None,
            user_id: None,
            state: Mutex::new(SessionState {
                transcript: Transcript::new(),
                generation: 0,
                welcome: true,
                cancel: CancellationToken::new(),
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Forward every accepted submission to `history` under `user_id`
    pub fn with_history(mut self, history: Arc<dyn HistorySync>, user_id: impl Into<String>) -> Self {
        self.history = Some(history);
        self.user_id = Some(user_id.into());
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit the user's input
    ///
    /// Empty or whitespace-only input, or input arriving while another
    /// submission is in flight, is rejected without touching the
    /// transcript. Otherwise the raw input is appended, sent to the
    /// provider and to the history store, and exactly one assistant
    /// message follows it.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        if input.trim().is_empty() {
            debug!("Ignoring empty submission");
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Ignoring submission while a request is in flight");
            return SubmitOutcome::Rejected(RejectReason::InFlight);
        };

        let (generation, cancel) = {
            let mut state = self.lock_state();
            state.welcome = false;
            state.transcript.push(Message::user(input));
            (state.generation, state.cancel.clone())
        };

        info!("Submitting prompt: generation={}, chars={}", generation, input.len());

        let completion = async {
            tokio::select! {
                reply = self.provider.complete(input) => Some(reply),
                _ = cancel.cancelled() => None,
            }
        };

        let (reply, ()) = tokio::join!(completion, self.sync_history(input));

        let content = match reply {
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                warn!("Completion failed, using fallback reply: {:#}", e);
                FALLBACK_REPLY.to_string()
            }
            None => {
                info!("Completion cancelled by new conversation");
                return SubmitOutcome::Discarded;
            }
        };

        let mut state = self.lock_state();
        if state.generation != generation {
            info!(
                "Dropping stale reply: generation={}, current={}",
                generation, state.generation
            );
            return SubmitOutcome::Discarded;
        }

        let message = Message::assistant(content);
        state.transcript.push(message.clone());
        SubmitOutcome::Replied(message)
    }

    async fn sync_history(&self, text: &str) {
        let (Some(history), Some(user_id)) = (&self.history, &self.user_id) else {
            return;
        };

        match history.sync(user_id, text).await {
            Ok(()) => debug!("History synced for user {}", user_id),
            Err(e) => warn!("History sync failed for user {}: {:#}", user_id, e),
        }
    }

    /// Start over: empty the transcript and show the welcome state again
    ///
    /// An in-flight completion is cancelled and its reply, if any, is
    /// dropped.
    pub fn new_conversation(&self) {
        let mut state = self.lock_state();
        state.cancel.cancel();
        state.cancel = CancellationToken::new();
        state.generation += 1;
        state.transcript.clear();
        state.welcome = true;
        info!("Started new conversation: generation={}", state.generation);
    }

    /// Snapshot of the transcript
    pub fn transcript(&self) -> Transcript {
        self.lock_state().transcript.clone()
    }

    /// Snapshot of the messages in display order
    pub fn messages(&self) -> Vec<Message> {
        self.lock_state().transcript.messages().to_vec()
    }

    /// Number of messages in the transcript
    pub fn len(&self) -> usize {
        self.lock_state().transcript.len()
    }

    /// True when the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.lock_state().transcript.is_empty()
    }

    /// True while a submission is waiting for its reply
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// True until the first accepted submission of a conversation
    pub fn is_welcome(&self) -> bool {
        self.lock_state().welcome
    }

    /// Number of times the conversation has been reset
    pub fn generation(&self) -> u64 {
        self.lock_state().generation
    }

    /// User whose history receives prompts, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Model used by the provider, if known
    pub fn model(&self) -> Option<String> {
        self.provider.current_model()
    }
}
