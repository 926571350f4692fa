//! Chat module for ZenMedic
//!
//! Messages, the transcript they live in, and the session that runs the
//! submit -> complete -> sync -> reply loop.

pub mod message;
pub mod session;
pub mod transcript;

pub use message::{Message, Role};
pub use session::{ChatSession, RejectReason, SubmitOutcome, FALLBACK_REPLY};
pub use transcript::Transcript;
