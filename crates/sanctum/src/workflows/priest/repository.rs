use super::domain::{ListingId, PriestListing, ProfileChange};
use crate::workflows::profiles::{RepositoryError, UserId};

/// Storage seam over the priest-listing table.
///
/// `insert` must reject a second listing for the same `user_id` with
/// [`RepositoryError::Conflict`]; the provisioner checks first, this is the
/// backstop keeping the one-listing-per-user invariant.
pub trait PriestListingRepository: Send + Sync {
    fn insert(&self, listing: PriestListing) -> Result<PriestListing, RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<PriestListing>, RepositoryError>;
    fn fetch_by_user(&self, user_id: &UserId) -> Result<Option<PriestListing>, RepositoryError>;
    fn update(&self, listing: PriestListing) -> Result<(), RepositoryError>;
}

/// Observer invoked after each successful profile mutation so cached read
/// models (admin directory, own-profile views, dashboard gating) refresh.
/// Notification is in-process and must not fail the workflow.
pub trait ProfileChangeNotifier: Send + Sync {
    fn profile_changed(&self, user_id: &UserId, change: ProfileChange);
}
