//! Hosted user backend
//!
//! Client for the per-user history, account and auth endpoints, plus the
//! credential checks that run before login and signup.

pub mod client;
pub mod types;
pub mod validation;

pub use client::{BackendClient, HistorySync};
pub use types::{Profile, UserDetails};
pub use validation::{validate_login, validate_signup};
