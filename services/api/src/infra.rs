use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sanctum::workflows::booking::{
    BookingId, BookingStatus, PriestBooking, PriestBookingRepository, ServiceBooking,
    ServiceBookingRepository, ServiceId,
};
use sanctum::workflows::directory::{AccountError, AccountProvider};
use sanctum::workflows::priest::{
    ListingId, PriestListing, PriestListingRepository, ProfileChange, ProfileChangeNotifier,
};
use sanctum::workflows::profiles::{
    PriestStatus, Profile, ProfileRepository, ProfileUpdate, RepositoryError, UserId,
};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<UserId, Profile>>>,
}

impl InMemoryProfileRepository {
    fn mutate<F>(&self, id: &UserId, apply: F) -> Result<Profile, RepositoryError>
    where
        F: FnOnce(&mut Profile),
    {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        apply(profile);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        let mut profiles: Vec<Profile> = guard.values().cloned().collect();
        profiles.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(profiles)
    }

    fn set_priest_status(
        &self,
        id: &UserId,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError> {
        self.mutate(id, |profile| profile.priest_status = status)
    }

    fn set_priest_flags(
        &self,
        id: &UserId,
        is_priest: bool,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError> {
        self.mutate(id, |profile| {
            profile.is_priest = is_priest;
            profile.priest_status = status;
        })
    }

    fn update_details(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        self.mutate(id, |profile| {
            if let Some(first_name) = update.first_name {
                profile.first_name = Some(first_name);
            }
            if let Some(last_name) = update.last_name {
                profile.last_name = Some(last_name);
            }
            if let Some(avatar_url) = update.avatar_url {
                profile.avatar_url = Some(avatar_url);
            }
        })
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPriestListingRepository {
    records: Arc<Mutex<HashMap<ListingId, PriestListing>>>,
}

impl PriestListingRepository for InMemoryPriestListingRepository {
    fn insert(&self, listing: PriestListing) -> Result<PriestListing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        if guard.values().any(|row| row.user_id == listing.user_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<PriestListing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn fetch_by_user(&self, user_id: &UserId) -> Result<Option<PriestListing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.values().find(|row| row.user_id == *user_id).cloned())
    }

    fn update(&self, listing: PriestListing) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        if guard.contains_key(&listing.id) {
            guard.insert(listing.id.clone(), listing);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPriestBookingRepository {
    records: Arc<Mutex<HashMap<BookingId, PriestBooking>>>,
}

impl PriestBookingRepository for InMemoryPriestBookingRepository {
    fn insert(&self, booking: PriestBooking) -> Result<PriestBooking, RepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        if guard.contains_key(&booking.id) {
            return Err(RepositoryError::Conflict);
        }
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
        let mut rows: Vec<PriestBooking> = guard
            .values()
            .filter(|row| row.user_id == *user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.booking_date.cmp(&b.booking_date));
        Ok(rows)
    }

    fn for_priest(&self, priest_id: &ListingId) -> Result<Vec<PriestBooking>, RepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        let mut rows: Vec<PriestBooking> = guard
            .values()
            .filter(|row| row.priest_id == *priest_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.booking_date.cmp(&b.booking_date));
        Ok(rows)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryServiceBookingRepository {
    records: Arc<Mutex<HashMap<BookingId, ServiceBooking>>>,
}

impl ServiceBookingRepository for InMemoryServiceBookingRepository {
    fn insert(&self, booking: ServiceBooking) -> Result<ServiceBooking, RepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        if guard.contains_key(&booking.id) {
            return Err(RepositoryError::Conflict);
        }
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
        let mut rows: Vec<ServiceBooking> = guard
            .values()
            .filter(|row| row.user_id == *user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.booking_date.cmp(&b.booking_date));
        Ok(rows)
    }

    fn for_service(&self, service_id: &ServiceId) -> Result<Vec<ServiceBooking>, RepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        let mut rows: Vec<ServiceBooking> = guard
            .values()
            .filter(|row| row.service_id == *service_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.booking_date.cmp(&b.booking_date));
        Ok(rows)
    }
}

/// Email lookups backed by a fixed map, standing in for the auth provider's
/// admin API.
#[derive(Default, Clone)]
pub(crate) struct StaticAccountProvider {
    emails: Arc<Mutex<HashMap<UserId, String>>>,
}

impl StaticAccountProvider {
    pub(crate) fn register(&self, user_id: UserId, email: impl Into<String>) {
        self.emails
            .lock()
            .expect("account mutex poisoned")
            .insert(user_id, email.into());
    }
}

impl AccountProvider for StaticAccountProvider {
    fn email(&self, user_id: &UserId) -> Result<Option<String>, AccountError> {
        let guard = self.emails.lock().expect("account mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

/// Change observer that logs each mutation and bumps a generation counter;
/// read models poll the counter instead of refetching on a timer.
#[derive(Default, Clone)]
pub(crate) struct LoggingChangeNotifier {
    generation: Arc<AtomicU64>,
}

impl LoggingChangeNotifier {
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl ProfileChangeNotifier for LoggingChangeNotifier {
    fn profile_changed(&self, user_id: &UserId, change: ProfileChange) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        debug!(user = %user_id, change = change.label(), "profile changed");
    }
}
