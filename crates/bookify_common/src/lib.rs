// --- File: crates/bookify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Booking entity and request payloads
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    external_service_error, internal_error, invalid_state, not_found, validation_error,
    BookifyError, Context, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init_from_config, init_with_level, parse_level};

// This crate provides the pieces shared by every Bookify crate: the booking
// model, the error taxonomy and its HTTP mapping, logging setup and the
// notifier abstraction.
