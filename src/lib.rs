//! ZenMedic - medical chat assistant library
//!
//! This library provides the pieces behind the ZenMedic CLI: a completion
//! client for the hosted model, the in-memory chat transcript, the
//! submission handler that ties them together, and the user backend that
//! stores each prompt in the user's history.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `providers`: Completion provider abstraction and the Mistral client
//! - `chat`: Messages, transcript and the chat session
//! - `backend`: User backend client (history, profile, accounts)
//! - `prompts`: Medical prompt template
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use zenmedic::{create_provider, ChatSession, Config, SubmitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let session = ChatSession::new(Arc::from(create_provider(&config)?));
//!     if let SubmitOutcome::Replied(reply) = session.submit("I have a headache").await {
//!         println!("{}", reply.content());
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;

// Re-export commonly used types
pub use backend::{BackendClient, HistorySync};
pub use chat::{ChatSession, Message, RejectReason, Role, SubmitOutcome, Transcript};
pub use config::Config;
pub use error::{Result, ZenmedicError};
pub use providers::{create_provider, Provider};

#[cfg(test)]
pub mod test_utils;
