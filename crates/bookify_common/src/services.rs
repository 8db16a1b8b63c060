// --- File: crates/bookify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! Traits here decouple the booking logic from concrete transports so that
//! implementations can be swapped at startup and replaced by doubles in tests.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::models::Booking;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors raised while delivering an email.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    /// The request never got an answer (connect, timeout, TLS).
    #[error("email transport failed: {0}")]
    Transport(String),

    /// The relay answered with a non-success status.
    #[error("email relay rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The notifier is missing required settings.
    #[error("email notifier misconfigured: {0}")]
    Config(String),
}

/// A rendered approval email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Delivers booking emails.
pub trait EmailNotifier: Send + Sync {
    /// Tell the contact that their booking was approved.
    fn send_approval<'a>(&'a self, booking: &'a Booking) -> BoxFuture<'a, (), NotifierError>;
}
