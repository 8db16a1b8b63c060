//! SQL implementation of the booking store
//!
//! Works through the sqlx `Any` driver. All values are bound as text since
//! `Any` cannot encode UUIDs or chrono timestamps.

use crate::error::DbError;
use crate::repositories::booking::{
    normalize_note, storage_precision, to_db_timestamp, BookingChanges, BookingRow, BookingStore,
    NewBookingRecord,
};
use crate::DbClient;
use bookify_common::models::{Booking, BookingStatus};
use bookify_common::services::BoxFuture;
use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, created_at, updated_at, org_id, status,
           contact_name, contact_email,
           event_title, event_location_id, event_start, event_end, event_details,
           request_note
    FROM bookings
"#;

/// SQL implementation of the booking store
#[derive(Debug, Clone)]
pub struct SqlBookingStore {
    /// The database client
    db_client: DbClient,
}

impl SqlBookingStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    async fn fetch_one_by_id(&self, id: Uuid) -> Result<Option<Booking>, DbError> {
        let query = format!("{SELECT_COLUMNS} WHERE id = $1");

        let row = sqlx::query_as::<_, BookingRow>(&query)
            .bind(id.to_string())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to fetch booking {}: {}", id, e);
                DbError::QueryError(e.to_string())
            })?;

        row.map(Booking::try_from).transpose()
    }

    fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, DbError> {
        rows.into_iter().map(Booking::try_from).collect()
    }
}

impl BookingStore for SqlBookingStore {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing booking schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS bookings (
                    id TEXT PRIMARY KEY,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    org_id TEXT NOT NULL,
                    status TEXT NOT NULL,
                    contact_name TEXT NOT NULL,
                    contact_email TEXT NOT NULL,
                    event_title TEXT NOT NULL,
                    event_location_id TEXT NOT NULL,
                    event_start TEXT NOT NULL,
                    event_end TEXT NOT NULL,
                    event_details TEXT NOT NULL,
                    request_note TEXT NOT NULL DEFAULT ''
                )
            "#;
            self.db_client.execute(query).await?;

            self.db_client
                .execute(
                    "CREATE INDEX IF NOT EXISTS idx_bookings_location_status \
                     ON bookings (event_location_id, status)",
                )
                .await?;

            info!("Booking schema initialized successfully");
            Ok(())
        })
    }

    fn ping(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            if self.db_client.is_healthy().await {
                Ok(())
            } else {
                Err(DbError::QueryError("health check query failed".to_string()))
            }
        })
    }

    fn get(&self, id: Uuid) -> BoxFuture<'_, Option<Booking>, DbError> {
        Box::pin(async move {
            debug!("Finding booking {}", id);
            self.fetch_one_by_id(id).await
        })
    }

    fn list(&self) -> BoxFuture<'_, Vec<Booking>, DbError> {
        Box::pin(async move {
            debug!("Listing all bookings");
            let query = format!("{SELECT_COLUMNS} ORDER BY created_at ASC, id ASC");

            let rows = sqlx::query_as::<_, BookingRow>(&query)
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list bookings: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Self::into_bookings(rows)
        })
    }

    fn list_by_location(
        &self,
        location_id: Uuid,
        status: BookingStatus,
    ) -> BoxFuture<'_, Vec<Booking>, DbError> {
        Box::pin(async move {
            debug!("Listing {} bookings at location {}", status, location_id);
            let query = format!(
                "{SELECT_COLUMNS} WHERE event_location_id = $1 AND status = $2 \
                 ORDER BY created_at ASC, id ASC"
            );

            let rows = sqlx::query_as::<_, BookingRow>(&query)
                .bind(location_id.to_string())
                .bind(status.as_str())
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list bookings for location {}: {}", location_id, e);
                    DbError::QueryError(e.to_string())
                })?;

            Self::into_bookings(rows)
        })
    }

    fn insert(&self, record: NewBookingRecord) -> BoxFuture<'_, Booking, DbError> {
        Box::pin(async move {
            let now = storage_precision(Utc::now());
            let mut event = record.event;
            event.start = storage_precision(event.start);
            event.end = storage_precision(event.end);

            let booking = Booking {
                id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
                org_id: record.org_id,
                status: record.status,
                contact: record.contact,
                event,
                request_note: normalize_note(record.request_note),
            };
            debug!("Inserting booking {} with status {}", booking.id, booking.status);

            let row = BookingRow::from(&booking);
            let query = r#"
                INSERT INTO bookings (
                    id, created_at, updated_at, org_id, status,
                    contact_name, contact_email,
                    event_title, event_location_id, event_start, event_end, event_details,
                    request_note
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#;

            sqlx::query(query)
                .bind(row.id)
                .bind(row.created_at)
                .bind(row.updated_at)
                .bind(row.org_id)
                .bind(row.status)
                .bind(row.contact_name)
                .bind(row.contact_email)
                .bind(row.event_title)
                .bind(row.event_location_id)
                .bind(row.event_start)
                .bind(row.event_end)
                .bind(row.event_details)
                .bind(row.request_note)
                .execute(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert booking: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            info!("Booking {} created", booking.id);
            Ok(booking)
        })
    }

    fn update(
        &self,
        id: Uuid,
        changes: BookingChanges,
    ) -> BoxFuture<'_, Option<Booking>, DbError> {
        Box::pin(async move {
            debug!("Updating booking {}", id);

            let (contact_name, contact_email) = match changes.contact {
                Some(contact) => (Some(contact.name), Some(contact.email)),
                None => (None, None),
            };
            let (title, location_id, start, end, details) = match changes.event {
                Some(event) => (
                    Some(event.title),
                    Some(event.location_id.to_string()),
                    Some(to_db_timestamp(&storage_precision(event.start))),
                    Some(to_db_timestamp(&storage_precision(event.end))),
                    Some(event.details),
                ),
                None => (None, None, None, None, None),
            };
            let updated_at = to_db_timestamp(&storage_precision(Utc::now()));

            let query = r#"
                UPDATE bookings SET
                    status = COALESCE($1, status),
                    contact_name = COALESCE($2, contact_name),
                    contact_email = COALESCE($3, contact_email),
                    event_title = COALESCE($4, event_title),
                    event_location_id = COALESCE($5, event_location_id),
                    event_start = COALESCE($6, event_start),
                    event_end = COALESCE($7, event_end),
                    event_details = COALESCE($8, event_details),
                    request_note = COALESCE($9, request_note),
                    updated_at = $10
                WHERE id = $11
            "#;

            let result = sqlx::query(query)
                .bind(changes.status.map(|s| s.as_str().to_string()))
                .bind(contact_name)
                .bind(contact_email)
                .bind(title)
                .bind(location_id)
                .bind(start)
                .bind(end)
                .bind(details)
                .bind(changes.request_note.map(Option::unwrap_or_default))
                .bind(updated_at)
                .bind(id.to_string())
                .execute(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to update booking {}: {}", id, e);
                    DbError::QueryError(e.to_string())
                })?;

            if result.rows_affected() == 0 {
                debug!("No booking {} to update", id);
                return Ok(None);
            }

            self.fetch_one_by_id(id).await
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'_, Option<Uuid>, DbError> {
        Box::pin(async move {
            debug!("Deleting booking {}", id);

            let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
                .bind(id.to_string())
                .execute(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to delete booking {}: {}", id, e);
                    DbError::QueryError(e.to_string())
                })?;

            if result.rows_affected() > 0 {
                info!("Booking {} deleted", id);
                Ok(Some(id))
            } else {
                Ok(None)
            }
        })
    }
}
