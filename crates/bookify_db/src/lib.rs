//! Booking persistence for Bookify
//!
//! A database agnostic client built on sqlx's `Any` driver, plus the
//! `BookingStore` abstraction with SQL and in-memory implementations.
//!
//! SQLite is enabled by default; PostgreSQL and MySQL are available through
//! the `postgres` and `mysql` features.
//!
//! # Example
//!
//! ```rust,no_run
//! use bookify_db::{BookingStore, DbClient, RepositoryFactory, BookingRepositoryFactory};
//!
//! async fn setup() -> Result<(), bookify_db::error::DbError> {
//!     let client = DbClient::from_url("sqlite:data/bookify.db").await?;
//!     let store = BookingRepositoryFactory::new().create_repository(client);
//!     store.init_schema().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod repository;

pub use client::DbClient;
pub use error::DbError;
pub use repository::RepositoryFactory;

pub use repositories::{
    normalize_note, storage_precision, BookingChanges, BookingRepositoryFactory, BookingRow,
    BookingStore, InMemoryBookingStore, NewBookingRecord, SqlBookingStore,
};
