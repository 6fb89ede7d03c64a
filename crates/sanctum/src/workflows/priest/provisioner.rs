use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{ListingId, PriestListing};
use super::repository::PriestListingRepository;
use crate::workflows::profiles::{ProfileRepository, RepositoryError, UserId};

/// Placeholder display name when the profile carries no usable name parts.
pub const DEFAULT_LISTING_NAME: &str = "New Priest";
pub const DEFAULT_DESCRIPTION: &str =
    "This priest has not added a description yet. Check back soon.";
pub const DEFAULT_SPECIALTY: &str = "General rituals";
pub const DEFAULT_AVATAR_URL: &str = "/images/priests/placeholder.svg";
pub const DEFAULT_BASE_PRICE: u32 = 1100;
pub const DEFAULT_AVAILABILITY: &str = "By appointment";
pub const DEFAULT_LOCATION: &str = "To be announced";
pub const DEFAULT_RATING: f32 = 4.5;

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("plst-{id:06}"))
}

/// Outcome of [`PriestListingProvisioner::ensure_listing`], distinguishing
/// a fresh insert from an already-present listing.
#[derive(Debug, Clone)]
pub enum ProvisionOutcome {
    Created(PriestListing),
    Existing(PriestListing),
}

impl ProvisionOutcome {
    pub fn listing(&self) -> &PriestListing {
        match self {
            ProvisionOutcome::Created(listing) | ProvisionOutcome::Existing(listing) => listing,
        }
    }

    pub fn into_listing(self) -> PriestListing {
        match self {
            ProvisionOutcome::Created(listing) | ProvisionOutcome::Existing(listing) => listing,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, ProvisionOutcome::Created(_))
    }
}

/// Error raised while ensuring a listing exists. Both lookup and insert
/// failures propagate; the approval workflow's rollback decision depends
/// on seeing them.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("profile {0} not found")]
    ProfileMissing(UserId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Idempotent create-if-absent for the public priest listing that backs a
/// newly approved priest's page.
pub struct PriestListingProvisioner<P, L> {
    profiles: Arc<P>,
    listings: Arc<L>,
}

impl<P, L> PriestListingProvisioner<P, L>
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
{
    pub fn new(profiles: Arc<P>, listings: Arc<L>) -> Self {
        Self { profiles, listings }
    }

    /// Guarantee exactly one listing exists for `user_id`. Calling this
    /// again after a successful run is a no-op.
    pub fn ensure_listing(&self, user_id: &UserId) -> Result<ProvisionOutcome, ProvisionError> {
        if let Some(existing) = self.listings.fetch_by_user(user_id)? {
            return Ok(ProvisionOutcome::Existing(existing));
        }

        let profile = self
            .profiles
            .fetch(user_id)?
            .ok_or_else(|| ProvisionError::ProfileMissing(user_id.clone()))?;

        let name = profile
            .display_name()
            .unwrap_or_else(|| DEFAULT_LISTING_NAME.to_string());

        let now = Utc::now();
        let listing = PriestListing {
            id: next_listing_id(),
            user_id: user_id.clone(),
            name,
            description: DEFAULT_DESCRIPTION.to_string(),
            specialties: vec![DEFAULT_SPECIALTY.to_string()],
            experience_years: 0,
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            base_price: DEFAULT_BASE_PRICE,
            availability: DEFAULT_AVAILABILITY.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            rating: DEFAULT_RATING,
            created_at: now,
            updated_at: now,
        };

        let stored = self.listings.insert(listing)?;
        info!(user = %user_id, listing = %stored.id, "provisioned priest listing");
        Ok(ProvisionOutcome::Created(stored))
    }
}
