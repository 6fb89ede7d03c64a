use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;

use super::domain::{
    BookingId, BookingStatus, PriestBooking, PriestBookingRequest, ServiceBooking,
    ServiceBookingRequest, ServiceId, UserBookings,
};
use super::repository::{PriestBookingRepository, ServiceBookingRepository};
use crate::workflows::priest::ListingId;
use crate::workflows::profiles::{Actor, RepositoryError, UserId};

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_id() -> BookingId {
    let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BookingId(format!("bkg-{id:06}"))
}

/// Error raised by the booking store.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BookingError {
    /// HTTP status this error maps to at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            BookingError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            BookingError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Facade over both booking tables. No conflict detection: two bookings
/// for the same priest at overlapping times are both accepted, matching
/// shipped behavior.
pub struct BookingService<B, S> {
    priest_bookings: Arc<B>,
    service_bookings: Arc<S>,
}

impl<B, S> BookingService<B, S>
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    pub fn new(priest_bookings: Arc<B>, service_bookings: Arc<S>) -> Self {
        Self {
            priest_bookings,
            service_bookings,
        }
    }

    /// Record a new priest engagement for the caller, starting pending.
    pub fn book_priest(
        &self,
        actor: &Actor,
        request: PriestBookingRequest,
    ) -> Result<PriestBooking, BookingError> {
        let now = Utc::now();
        let booking = PriestBooking {
            id: next_booking_id(),
            user_id: actor.user_id.clone(),
            priest_id: request.priest_id,
            booking_date: request.booking_date,
            purpose: request.purpose,
            address: request.address,
            notes: request.notes,
            price: request.price,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let stored = self.priest_bookings.insert(booking)?;
        info!(booking = %stored.id, priest = %stored.priest_id, "priest booking created");
        Ok(stored)
    }

    /// Record a new service booking for the caller, starting pending.
    pub fn book_service(
        &self,
        actor: &Actor,
        request: ServiceBookingRequest,
    ) -> Result<ServiceBooking, BookingError> {
        let now = Utc::now();
        let booking = ServiceBooking {
            id: next_booking_id(),
            user_id: actor.user_id.clone(),
            service_id: request.service_id,
            booking_date: request.booking_date,
            notes: request.notes,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let stored = self.service_bookings.insert(booking)?;
        info!(booking = %stored.id, service = %stored.service_id, "service booking created");
        Ok(stored)
    }

    /// Move a priest booking to `status`. Transitions are unconstrained.
    pub fn update_priest_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<PriestBooking, BookingError> {
        let updated = self.priest_bookings.update_status(id, status)?;
        info!(booking = %id, status = status.label(), "priest booking status updated");
        Ok(updated)
    }

    /// Move a service booking to `status`. Transitions are unconstrained.
    pub fn update_service_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<ServiceBooking, BookingError> {
        let updated = self.service_bookings.update_status(id, status)?;
        info!(booking = %id, status = status.label(), "service booking status updated");
        Ok(updated)
    }

    /// Everything a user has booked, across both tables.
    pub fn bookings_for_user(&self, user_id: &UserId) -> Result<UserBookings, BookingError> {
        Ok(UserBookings {
            priest_bookings: self.priest_bookings.for_user(user_id)?,
            service_bookings: self.service_bookings.for_user(user_id)?,
        })
    }

    /// Work queue for a priest's dashboard.
    pub fn bookings_for_priest(
        &self,
        priest_id: &ListingId,
    ) -> Result<Vec<PriestBooking>, BookingError> {
        Ok(self.priest_bookings.for_priest(priest_id)?)
    }

    /// All bookings against one catalogued service.
    pub fn bookings_for_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<ServiceBooking>, BookingError> {
        Ok(self.service_bookings.for_service(service_id)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{Duration, TimeZone};

    use super::*;

    #[derive(Default)]
    struct MemoryPriestBookings {
        records: Mutex<HashMap<BookingId, PriestBooking>>,
    }

    impl PriestBookingRepository for MemoryPriestBookings {
        fn insert(&self, booking: PriestBooking) -> Result<PriestBooking, RepositoryError> {
            let mut guard = self.records.lock().expect("booking mutex poisoned");
            guard.insert(booking.id.clone(), booking.clone());
            Ok(booking)
        }

        fn fetch(&self, id: &BookingId) -> Result<Option<PriestBooking>, RepositoryError> {
            let guard = self.records.lock().expect("booking mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn update_status(
            &self,
            id: &BookingId,
            status: BookingStatus,
        ) -> Result<PriestBooking, RepositoryError> {
            let mut guard = self.records.lock().expect("booking mutex poisoned");
            let booking = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            booking.status = status;
            booking.updated_at = Utc::now();
            Ok(booking.clone())
        }

        fn for_user(&self, user_id: &UserId) -> Result<Vec<PriestBooking>, RepositoryError> {
            let guard = self.records.lock().expect("booking mutex poisoned");
            Ok(guard
                .values()
                .filter(|booking| booking.user_id == *user_id)
                .cloned()
                .collect())
        }

        fn for_priest(&self, priest_id: &ListingId) -> Result<Vec<PriestBooking>, RepositoryError> {
            let guard = self.records.lock().expect("booking mutex poisoned");
            Ok(guard
                .values()
                .filter(|booking| booking.priest_id == *priest_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct MemoryServiceBookings {
        records: Mutex<HashMap<BookingId, ServiceBooking>>,
    }

    impl ServiceBookingRepository for MemoryServiceBookings {
        fn insert(&self, booking: ServiceBooking) -> Result<ServiceBooking, RepositoryError> {
            let mut guard = self.records.lock().expect("booking mutex poisoned");
            guard.insert(booking.id.clone(), booking.clone());
            Ok(booking)
        }

        fn fetch(&self, id: &BookingId) -> Result<Option<ServiceBooking>, RepositoryError> {
            let guard = self.records.lock().expect("booking mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn update_status(
            &self,
            id: &BookingId,
            status: BookingStatus,
        ) -> Result<ServiceBooking, RepositoryError> {
            let mut guard = self.records.lock().expect("booking mutex poisoned");
            let booking = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            booking.status = status;
            booking.updated_at = Utc::now();
            Ok(booking.clone())
        }

        fn for_user(&self, user_id: &UserId) -> Result<Vec<ServiceBooking>, RepositoryError> {
            let guard = self.records.lock().expect("booking mutex poisoned");
            Ok(guard
                .values()
                .filter(|booking| booking.user_id == *user_id)
                .cloned()
                .collect())
        }

        fn for_service(
            &self,
            service_id: &ServiceId,
        ) -> Result<Vec<ServiceBooking>, RepositoryError> {
            let guard = self.records.lock().expect("booking mutex poisoned");
            Ok(guard
                .values()
                .filter(|booking| booking.service_id == *service_id)
                .cloned()
                .collect())
        }
    }

    fn build_service() -> BookingService<MemoryPriestBookings, MemoryServiceBookings> {
        BookingService::new(
            Arc::new(MemoryPriestBookings::default()),
            Arc::new(MemoryServiceBookings::default()),
        )
    }

    fn devotee() -> Actor {
        Actor {
            user_id: UserId::new("usr-7"),
            is_admin: false,
        }
    }

    fn priest_request() -> PriestBookingRequest {
        PriestBookingRequest {
            priest_id: ListingId("plst-000001".to_string()),
            booking_date: Utc.with_ymd_and_hms(2026, 9, 12, 9, 30, 0).unwrap(),
            purpose: "Griha pravesh".to_string(),
            address: "14 Temple Road".to_string(),
            notes: Some("North-facing entrance".to_string()),
            price: 2100,
        }
    }

    #[test]
    fn book_priest_starts_pending_with_caller_identity() {
        let service = build_service();
        let booking = service
            .book_priest(&devotee(), priest_request())
            .expect("booking succeeds");

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.user_id, UserId::new("usr-7"));
        assert_eq!(booking.purpose, "Griha pravesh");
        assert_eq!(booking.created_at, booking.updated_at);
    }

    #[test]
    fn update_status_touches_only_status_and_timestamp() {
        let service = build_service();
        let booking = service
            .book_priest(&devotee(), priest_request())
            .expect("booking succeeds");

        let updated = service
            .update_priest_status(&booking.id, BookingStatus::Confirmed)
            .expect("status updates");

        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert!(updated.updated_at >= booking.updated_at);
        // every other field is untouched
        assert_eq!(updated.id, booking.id);
        assert_eq!(updated.user_id, booking.user_id);
        assert_eq!(updated.priest_id, booking.priest_id);
        assert_eq!(updated.booking_date, booking.booking_date);
        assert_eq!(updated.purpose, booking.purpose);
        assert_eq!(updated.address, booking.address);
        assert_eq!(updated.notes, booking.notes);
        assert_eq!(updated.price, booking.price);
        assert_eq!(updated.created_at, booking.created_at);
    }

    #[test]
    fn transitions_are_unconstrained() {
        let service = build_service();
        let booking = service
            .book_priest(&devotee(), priest_request())
            .expect("booking succeeds");

        // completed straight back to pending is accepted
        service
            .update_priest_status(&booking.id, BookingStatus::Completed)
            .expect("to completed");
        let reverted = service
            .update_priest_status(&booking.id, BookingStatus::Pending)
            .expect("back to pending");
        assert_eq!(reverted.status, BookingStatus::Pending);
    }

    #[test]
    fn overlapping_bookings_are_both_accepted() {
        let service = build_service();
        let first = service
            .book_priest(&devotee(), priest_request())
            .expect("first booking");
        let second = service
            .book_priest(&devotee(), priest_request())
            .expect("second booking at the same time");

        assert_ne!(first.id, second.id);
        let queue = service
            .bookings_for_priest(&first.priest_id)
            .expect("queue loads");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn unknown_booking_surfaces_not_found() {
        let service = build_service();
        match service.update_priest_status(
            &BookingId("bkg-missing".to_string()),
            BookingStatus::Cancelled,
        ) {
            Err(BookingError::Repository(RepositoryError::NotFound)) => {}
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn user_history_spans_both_tables() {
        let service = build_service();
        service
            .book_priest(&devotee(), priest_request())
            .expect("priest booking");
        service
            .book_service(
                &devotee(),
                ServiceBookingRequest {
                    service_id: ServiceId("svc-satyanarayan".to_string()),
                    booking_date: Utc.with_ymd_and_hms(2026, 9, 12, 9, 30, 0).unwrap()
                        + Duration::days(3),
                    notes: None,
                },
            )
            .expect("service booking");

        let history = service
            .bookings_for_user(&UserId::new("usr-7"))
            .expect("history loads");
        assert_eq!(history.priest_bookings.len(), 1);
        assert_eq!(history.service_bookings.len(), 1);

        let other = service
            .bookings_for_user(&UserId::new("usr-8"))
            .expect("history loads");
        assert!(other.priest_bookings.is_empty());
        assert!(other.service_bookings.is_empty());
    }
}
