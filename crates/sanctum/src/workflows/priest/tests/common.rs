use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::priest::domain::{ListingId, PriestListing, ProfileChange};
use crate::workflows::priest::repository::{PriestListingRepository, ProfileChangeNotifier};
use crate::workflows::priest::router::priest_router;
use crate::workflows::priest::service::PriestApplicationService;
use crate::workflows::profiles::{
    PriestStatus, Profile, ProfileRepository, ProfileUpdate, RepositoryError, UserId,
};

pub(super) fn user(id: &str) -> UserId {
    UserId::new(id)
}

pub(super) fn seeded_profile(id: &str, first: Option<&str>, last: Option<&str>) -> Profile {
    let mut profile = Profile::new(user(id));
    profile.first_name = first.map(str::to_string);
    profile.last_name = last.map(str::to_string);
    profile
}

pub(super) fn admin_profile(id: &str) -> Profile {
    let mut profile = seeded_profile(id, Some("Asha"), Some("Admin"));
    profile.is_admin = true;
    profile
}

pub(super) type TestService =
    PriestApplicationService<MemoryProfiles, MemoryListings, RecordingNotifier>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryProfiles>,
    Arc<MemoryListings>,
    Arc<RecordingNotifier>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let listings = Arc::new(MemoryListings::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(PriestApplicationService::new(
        profiles.clone(),
        listings.clone(),
        notifier.clone(),
    ));
    (service, profiles, listings, notifier)
}

/// Service + seeded admin and applicant, the standard scenario fixture.
pub(super) fn seeded_service() -> (
    Arc<TestService>,
    Arc<MemoryProfiles>,
    Arc<MemoryListings>,
    Arc<RecordingNotifier>,
) {
    let (service, profiles, listings, notifier) = build_service();
    profiles
        .insert(admin_profile("adm-1"))
        .expect("admin seeds");
    profiles
        .insert(seeded_profile("usr-1", Some("Ravi"), Some("Shastri")))
        .expect("applicant seeds");
    (service, profiles, listings, notifier)
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    priest_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<UserId, Profile>>>,
}

impl ProfileRepository for MemoryProfiles {
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
        Ok(guard.values().cloned().collect())
    }

    fn set_priest_status(
        &self,
        id: &UserId,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.priest_status = status;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    fn set_priest_flags(
        &self,
        id: &UserId,
        is_priest: bool,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.is_priest = is_priest;
        profile.priest_status = status;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    fn update_details(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if let Some(first_name) = update.first_name {
            profile.first_name = Some(first_name);
        }
        if let Some(last_name) = update.last_name {
            profile.last_name = Some(last_name);
        }
        if let Some(avatar_url) = update.avatar_url {
            profile.avatar_url = Some(avatar_url);
        }
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryListings {
    records: Arc<Mutex<HashMap<ListingId, PriestListing>>>,
}

impl MemoryListings {
    pub(super) fn count(&self) -> usize {
        self.records.lock().expect("listing mutex poisoned").len()
    }
}

impl PriestListingRepository for MemoryListings {
    fn insert(&self, listing: PriestListing) -> Result<PriestListing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        let duplicate = guard
            .values()
            .any(|existing| existing.user_id == listing.user_id || existing.id == listing.id);
        if duplicate {
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
        Ok(guard
            .values()
            .find(|listing| listing.user_id == *user_id)
            .cloned())
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
pub(super) struct RecordingNotifier {
    events: Arc<Mutex<Vec<(UserId, ProfileChange)>>>,
}

impl RecordingNotifier {
    pub(super) fn events(&self) -> Vec<(UserId, ProfileChange)> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ProfileChangeNotifier for RecordingNotifier {
    fn profile_changed(&self, user_id: &UserId, change: ProfileChange) {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((user_id.clone(), change));
    }
}

/// Listing store whose writes always fail, for exercising the
/// compensating-rollback path after a successful flag write.
#[derive(Default, Clone)]
pub(super) struct FailingListings;

impl PriestListingRepository for FailingListings {
    fn insert(&self, _listing: PriestListing) -> Result<PriestListing, RepositoryError> {
        Err(RepositoryError::Unavailable("listing store offline".to_string()))
    }

    fn fetch(&self, _id: &ListingId) -> Result<Option<PriestListing>, RepositoryError> {
        Ok(None)
    }

    fn fetch_by_user(&self, _user_id: &UserId) -> Result<Option<PriestListing>, RepositoryError> {
        Ok(None)
    }

    fn update(&self, _listing: PriestListing) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("listing store offline".to_string()))
    }
}

/// Profile store that starts failing flag writes after a budget, so the
/// rollback write itself can be made to fail.
pub(super) struct FlakyProfiles {
    inner: MemoryProfiles,
    flag_writes_allowed: AtomicUsize,
}

impl FlakyProfiles {
    pub(super) fn allowing_flag_writes(inner: MemoryProfiles, allowed: usize) -> Self {
        Self {
            inner,
            flag_writes_allowed: AtomicUsize::new(allowed),
        }
    }

    fn consume_budget(&self) -> Result<(), RepositoryError> {
        let remaining = self.flag_writes_allowed.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(RepositoryError::Unavailable(
                "profile store offline".to_string(),
            ));
        }
        self.flag_writes_allowed.store(remaining - 1, Ordering::SeqCst);
        Ok(())
    }
}

impl ProfileRepository for FlakyProfiles {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        self.inner.insert(profile)
    }

    fn fetch(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        self.inner.list()
    }

    fn set_priest_status(
        &self,
        id: &UserId,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError> {
        self.inner.set_priest_status(id, status)
    }

    fn set_priest_flags(
        &self,
        id: &UserId,
        is_priest: bool,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError> {
        self.consume_budget()?;
        self.inner.set_priest_flags(id, is_priest, status)
    }

    fn update_details(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        self.inner.update_details(id, update)
    }
}
