// --- File: crates/bookify_bookings/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod notifier;
pub mod routes;
pub mod service;
#[cfg(test)]
mod service_test;

pub use error::BookingError;
pub use notifier::{notifier_from_config, HttpEmailNotifier, LogEmailNotifier};
pub use routes::routes;
pub use service::BookingService;
