//! Repository modules for database access

pub mod booking;
pub mod booking_factory;
pub mod booking_memory;
pub mod booking_sql;

// Re-export the booking store and its implementations for ease of use
pub use booking::{
    normalize_note, storage_precision, BookingChanges, BookingRow, BookingStore, NewBookingRecord,
};
pub use booking_factory::BookingRepositoryFactory;
pub use booking_memory::InMemoryBookingStore;
pub use booking_sql::SqlBookingStore;
