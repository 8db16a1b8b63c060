// --- File: crates/services/bookify_backend/src/app_state.rs ---
use bookify_bookings::{notifier_from_config, BookingService};
use bookify_common::{internal_error, BookifyError};
use bookify_config::AppConfig;
use bookify_db::{
    BookingRepositoryFactory, BookingStore, DbClient, InMemoryBookingStore, RepositoryFactory,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the routes need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
}

impl AppState {
    /// Connect the store, pick the notifier and build the booking service.
    ///
    /// Without a `[database]` section bookings live in memory only.
    pub async fn new(config: &AppConfig) -> Result<Self, BookifyError> {
        let store: Arc<dyn BookingStore> = match &config.database {
            Some(db_config) => {
                let client = DbClient::from_config(db_config)
                    .await
                    .map_err(|e| BookifyError::DatabaseError(e.to_string()))?;
                info!("Using SQL booking store");
                Arc::new(BookingRepositoryFactory::new().create_repository(client))
            }
            None => {
                warn!("No database configured; bookings are kept in memory and lost on restart");
                Arc::new(InMemoryBookingStore::new())
            }
        };

        store
            .init_schema()
            .await
            .map_err(|e| BookifyError::DatabaseError(e.to_string()))?;

        let notifier = notifier_from_config(config.email.as_ref())
            .map_err(|e| internal_error(format!("cannot set up email notifier: {e}")))?;

        Ok(Self {
            bookings: Arc::new(BookingService::new(store, notifier)),
        })
    }
}
