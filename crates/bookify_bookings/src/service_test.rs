#[cfg(test)]
mod tests {
    use crate::error::BookingError;
    use crate::service::BookingService;
    use bookify_common::models::{
        Booking, BookingPatch, BookingStatus, Contact, ContactPatch, EventInfo, EventPatch,
        NewBooking,
    };
    use bookify_common::services::{BoxFuture, EmailNotifier, NotifierError};
    use bookify_db::{
        BookingChanges, BookingRepositoryFactory, BookingStore, DbClient, DbError,
        InMemoryBookingStore, NewBookingRecord, RepositoryFactory,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    /// Records every approval it is asked to send.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Booking>>,
        fail_with: Option<NotifierError>,
    }

    impl RecordingNotifier {
        fn failing(error: NotifierError) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Some(error),
            }
        }

        fn sent(&self) -> Vec<Booking> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl EmailNotifier for RecordingNotifier {
        fn send_approval<'a>(&'a self, booking: &'a Booking) -> BoxFuture<'a, (), NotifierError> {
            Box::pin(async move {
                self.sent.lock().unwrap().push(booking.clone());
                match &self.fail_with {
                    Some(err) => Err(err.clone()),
                    None => Ok(()),
                }
            })
        }
    }

    /// A store whose every call fails.
    struct BrokenStore;

    impl BrokenStore {
        fn fail<T: Send + 'static>() -> BoxFuture<'static, T, DbError> {
            Box::pin(async { Err(DbError::QueryError("database is locked".into())) })
        }
    }

    impl BookingStore for BrokenStore {
        fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
            Self::fail()
        }
        fn ping(&self) -> BoxFuture<'_, (), DbError> {
            Self::fail()
        }
        fn get(&self, _id: Uuid) -> BoxFuture<'_, Option<Booking>, DbError> {
            Self::fail()
        }
        fn list(&self) -> BoxFuture<'_, Vec<Booking>, DbError> {
            Self::fail()
        }
        fn list_by_location(
            &self,
            _location_id: Uuid,
            _status: BookingStatus,
        ) -> BoxFuture<'_, Vec<Booking>, DbError> {
            Self::fail()
        }
        fn insert(&self, _record: NewBookingRecord) -> BoxFuture<'_, Booking, DbError> {
            Self::fail()
        }
        fn update(
            &self,
            _id: Uuid,
            _changes: BookingChanges,
        ) -> BoxFuture<'_, Option<Booking>, DbError> {
            Self::fail()
        }
        fn delete(&self, _id: Uuid) -> BoxFuture<'_, Option<Uuid>, DbError> {
            Self::fail()
        }
    }

    struct Harness {
        service: Arc<BookingService>,
        store: Arc<InMemoryBookingStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness_with(notifier: RecordingNotifier) -> Harness {
        let store = Arc::new(InMemoryBookingStore::new());
        let notifier = Arc::new(notifier);
        let service = Arc::new(BookingService::new(store.clone(), notifier.clone()));
        Harness {
            service,
            store,
            notifier,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingNotifier::default())
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 5, 1, hour, minute, 0).unwrap()
    }

    fn draft(location_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> NewBooking {
        NewBooking {
            org_id: Uuid::new_v4(),
            contact: Contact {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
            event: EventInfo {
                title: "Recital".into(),
                location_id,
                start,
                end,
                details: "Grand piano".into(),
            },
            request_note: None,
        }
    }

    async fn approved_at(
        h: &Harness,
        location_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Booking {
        let created = h.service.create_booking(draft(location_id, start, end)).await.unwrap();
        h.service.approve_booking(created.id).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_without_approved_neighbours_is_pending() {
        let h = harness();
        let stage = Uuid::new_v4();

        let first = h.service.create_booking(draft(stage, at(10, 0), at(11, 0))).await.unwrap();
        // Overlapping a pending booking is fine; only approved ones block.
        let second = h
            .service
            .create_booking(draft(stage, at(10, 30), at(11, 30)))
            .await
            .unwrap();

        assert_eq!(first.status, BookingStatus::Pending);
        assert_eq!(second.status, BookingStatus::Pending);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_create_overlapping_approved_is_denied_and_kept() {
        let h = harness();
        let stage = Uuid::new_v4();
        approved_at(&h, stage, at(10, 0), at(11, 0)).await;

        let denied = h.service.create_booking(draft(stage, at(9, 0), at(12, 0))).await.unwrap();

        assert_eq!(denied.status, BookingStatus::Denied);
        assert_eq!(h.service.get_booking(denied.id).await.unwrap(), denied);
    }

    #[tokio::test]
    async fn test_example_schedule_at_one_location() {
        let h = harness();
        let l1 = Uuid::new_v4();
        approved_at(&h, l1, at(10, 0), at(11, 0)).await;

        let overlapping = h
            .service
            .create_booking(draft(l1, at(10, 30), at(11, 30)))
            .await
            .unwrap();
        let adjacent = h.service.create_booking(draft(l1, at(11, 0), at(12, 0))).await.unwrap();

        assert_eq!(overlapping.status, BookingStatus::Denied);
        assert_eq!(adjacent.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_other_location_does_not_conflict() {
        let h = harness();
        approved_at(&h, Uuid::new_v4(), at(10, 0), at(11, 0)).await;

        let elsewhere = h
            .service
            .create_booking(draft(Uuid::new_v4(), at(10, 0), at(11, 0)))
            .await
            .unwrap();
        assert_eq!(elsewhere.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_without_storing() {
        let h = harness();
        let mut bad = draft(Uuid::new_v4(), at(11, 0), at(10, 0));
        bad.contact.email = "nope".into();

        let err = h.service.create_booking(bad).await.unwrap_err();

        assert!(matches!(err, BookingError::Validation(_)));
        assert!(h.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_pending_notifies_once() {
        let h = harness();
        let created = h
            .service
            .create_booking(draft(Uuid::new_v4(), at(10, 0), at(11, 0)))
            .await
            .unwrap();

        let approved = h.service.approve_booking(created.id).await.unwrap();

        assert_eq!(approved.status, BookingStatus::Approved);
        assert!(approved.updated_at >= created.updated_at);
        assert_eq!(h.notifier.sent(), vec![approved.clone()]);
        assert_eq!(h.service.get_booking(created.id).await.unwrap(), approved);
    }

    #[tokio::test]
    async fn test_approve_non_pending_is_invalid_state() {
        let h = harness();
        let stage = Uuid::new_v4();
        let approved = approved_at(&h, stage, at(10, 0), at(11, 0)).await;
        let denied = h.service.create_booking(draft(stage, at(10, 0), at(11, 0))).await.unwrap();

        for booking in [&approved, &denied] {
            let err = h.service.approve_booking(booking.id).await.unwrap_err();
            assert!(
                matches!(
                    err,
                    BookingError::InvalidState(ref m) if m == "cannot approve: not pending"
                ),
                "{err}"
            );
            let unchanged = h.service.get_booking(booking.id).await.unwrap();
            assert_eq!(unchanged.status, booking.status);
        }
        // Only the first approval sent an email.
        assert_eq!(h.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_approve_unknown_is_not_found() {
        let h = harness();
        let id = Uuid::new_v4();

        assert!(matches!(
            h.service.approve_booking(id).await,
            Err(BookingError::NotFound(missing)) if missing == id
        ));
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_approve_refuses_overlap_with_approved() {
        let h = harness();
        let stage = Uuid::new_v4();
        let first = h.service.create_booking(draft(stage, at(10, 0), at(11, 0))).await.unwrap();
        let second = h
            .service
            .create_booking(draft(stage, at(10, 30), at(11, 30)))
            .await
            .unwrap();
        h.service.approve_booking(first.id).await.unwrap();

        let err = h.service.approve_booking(second.id).await.unwrap_err();

        assert!(matches!(
            err,
            BookingError::InvalidState(ref m) if m == "cannot approve: overlaps an approved booking"
        ));
        assert_eq!(
            h.service.get_booking(second.id).await.unwrap().status,
            BookingStatus::Pending
        );
        let approved = h
            .store
            .list_by_location(stage, BookingStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_notification_keeps_approval() {
        let h = harness_with(RecordingNotifier::failing(NotifierError::Transport(
            "connection refused".into(),
        )));
        let created = h
            .service
            .create_booking(draft(Uuid::new_v4(), at(10, 0), at(11, 0)))
            .await
            .unwrap();

        let err = h.service.approve_booking(created.id).await.unwrap_err();

        match err {
            BookingError::Notification { booking, reason } => {
                assert_eq!(booking.id, created.id);
                assert_eq!(booking.status, BookingStatus::Approved);
                assert!(reason.contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            h.service.get_booking(created.id).await.unwrap().status,
            BookingStatus::Approved
        );
        assert_eq!(h.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_pending_updates_fields() {
        let h = harness();
        let created = h
            .service
            .create_booking(draft(Uuid::new_v4(), at(10, 0), at(11, 0)))
            .await
            .unwrap();

        let edited = h
            .service
            .edit_booking(
                created.id,
                BookingPatch {
                    contact: Some(ContactPatch {
                        email: Some("ada.king@example.com".into()),
                        name: None,
                    }),
                    event: Some(EventPatch {
                        end: Some(at(11, 30)),
                        ..EventPatch::default()
                    }),
                    request_note: Some(Some("Late finish".into())),
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.status, BookingStatus::Pending);
        assert_eq!(edited.contact.email, "ada.king@example.com");
        assert_eq!(edited.contact.name, "Ada");
        assert_eq!(edited.event.end, at(11, 30));
        assert_eq!(edited.request_note.as_deref(), Some("Late finish"));
        assert_eq!(edited.created_at, created.created_at);
        assert!(edited.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_edit_can_clear_request_note() {
        let h = harness();
        let mut request = draft(Uuid::new_v4(), at(10, 0), at(11, 0));
        request.request_note = Some("Side entrance".into());
        let created = h.service.create_booking(request).await.unwrap();

        let kept = h
            .service
            .edit_booking(created.id, BookingPatch::default())
            .await
            .unwrap();
        assert_eq!(kept.request_note.as_deref(), Some("Side entrance"));

        let cleared = h
            .service
            .edit_booking(
                created.id,
                BookingPatch {
                    request_note: Some(None),
                    ..BookingPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.request_note, None);
        assert_eq!(h.service.get_booking(created.id).await.unwrap().request_note, None);
    }

    #[tokio::test]
    async fn test_sub_microsecond_times_are_cut_before_conflict_check() {
        let h = harness();
        let stage = Uuid::new_v4();
        approved_at(&h, stage, at(10, 0), at(11, 0)).await;

        // Ends 500ns after the approved booking starts; stored, that is 10:00 sharp.
        let request = draft(stage, at(9, 0), at(10, 0) + Duration::nanoseconds(500));
        let created = h.service.create_booking(request).await.unwrap();

        assert_eq!(created.event.end, at(10, 0));
        assert_eq!(created.status, BookingStatus::Pending);
        assert_eq!(h.service.get_booking(created.id).await.unwrap(), created);

        let start = at(14, 0) + Duration::nanoseconds(123_456_789);
        let precise = h
            .service
            .create_booking(draft(stage, start, at(15, 0)))
            .await
            .unwrap();
        assert_eq!(precise.event.start, at(14, 0) + Duration::microseconds(123_456));
    }

    #[tokio::test]
    async fn test_sql_store_booking_without_note_survives_lifecycle() {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let store = BookingRepositoryFactory::new().create_repository(client);
        store.init_schema().await.unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = BookingService::new(Arc::new(store), notifier.clone());

        let created = service
            .create_booking(draft(Uuid::new_v4(), at(10, 0), at(11, 0)))
            .await
            .unwrap();
        assert_eq!(created.request_note, None);

        assert_eq!(service.get_booking(created.id).await.unwrap(), created);
        assert_eq!(service.list_bookings().await.unwrap(), vec![created.clone()]);

        let approved = service.approve_booking(created.id).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
        assert_eq!(approved.request_note, None);
        assert_eq!(notifier.sent(), vec![approved]);
    }

    #[tokio::test]
    async fn test_edit_into_approved_slot_denies() {
        let h = harness();
        let stage = Uuid::new_v4();
        approved_at(&h, stage, at(10, 0), at(11, 0)).await;
        let later = h.service.create_booking(draft(stage, at(12, 0), at(13, 0))).await.unwrap();

        let edited = h
            .service
            .edit_booking(
                later.id,
                BookingPatch {
                    event: Some(EventPatch {
                        start: Some(at(10, 30)),
                        ..EventPatch::default()
                    }),
                    ..BookingPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.status, BookingStatus::Denied);
        assert_eq!(edited.event.start, at(10, 30));
    }

    #[tokio::test]
    async fn test_edit_non_pending_is_invalid_state() {
        let h = harness();
        let approved = approved_at(&h, Uuid::new_v4(), at(10, 0), at(11, 0)).await;

        let err = h
            .service
            .edit_booking(
                approved.id,
                BookingPatch {
                    request_note: Some(Some("Can we move it?".into())),
                    ..BookingPatch::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::InvalidState(ref m) if m == "cannot edit: not pending"
        ));
        assert_eq!(h.service.get_booking(approved.id).await.unwrap(), approved);
    }

    #[tokio::test]
    async fn test_edit_rejects_inverted_window() {
        let h = harness();
        let created = h
            .service
            .create_booking(draft(Uuid::new_v4(), at(10, 0), at(11, 0)))
            .await
            .unwrap();

        let err = h
            .service
            .edit_booking(
                created.id,
                BookingPatch {
                    event: Some(EventPatch {
                        end: Some(at(9, 0)),
                        ..EventPatch::default()
                    }),
                    ..BookingPatch::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(h.service.get_booking(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_removes_any_status() {
        let h = harness();
        let approved = approved_at(&h, Uuid::new_v4(), at(10, 0), at(11, 0)).await;

        assert_eq!(h.service.delete_booking(approved.id).await.unwrap(), approved.id);
        assert!(matches!(
            h.service.get_booking(approved.id).await,
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(
            h.service.delete_booking(approved.id).await,
            Err(BookingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_empty_is_ok() {
        let h = harness();
        assert!(h.service.list_bookings().await.unwrap().is_empty());
        assert!(h.service.store_healthy().await);
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_one_approval_per_slot() {
        let h = harness();
        let stage = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = h.service.clone();
            handles.push(tokio::spawn(async move {
                let created = service.create_booking(draft(stage, at(10, 0), at(11, 0))).await?;
                service.approve_booking(created.id).await
            }));
        }

        let mut approved = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                approved += 1;
            }
        }

        assert_eq!(approved, 1);
        assert_eq!(
            h.store
                .list_by_location(stage, BookingStatus::Approved)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_store_failures_surface_as_store_errors() {
        let service = BookingService::new(
            Arc::new(BrokenStore),
            Arc::new(RecordingNotifier::default()),
        );

        assert!(matches!(service.list_bookings().await, Err(BookingError::Store(_))));
        assert!(matches!(
            service.create_booking(draft(Uuid::new_v4(), at(10, 0), at(11, 0))).await,
            Err(BookingError::Store(_))
        ));
        assert!(!service.store_healthy().await);
    }
}
