//! Factory for creating booking stores

use crate::repositories::booking_sql::SqlBookingStore;
use crate::{DbClient, RepositoryFactory};

/// Creates SQL booking stores from a database client
#[derive(Debug, Clone, Default)]
pub struct BookingRepositoryFactory;

impl BookingRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFactory<SqlBookingStore, DbClient> for BookingRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlBookingStore {
        SqlBookingStore::new(db_client)
    }
}
