//! Priest application workflow: the pending/approved/rejected lifecycle on
//! a user's profile, the idempotent listing provisioner that runs on
//! approval, and the HTTP surface for both.
//!
//! The flag writes and the listing insert hit two separate tables on a
//! backend without cross-entity transactions, so approval compensates by
//! rolling the flags back when provisioning fails. Consumers are informed
//! of every successful write through [`ProfileChangeNotifier`] so cached
//! read models can invalidate.

pub mod domain;
pub mod provisioner;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationStatusView, ListingId, ListingUpdate, PriestListing, ProfileChange,
};
pub use provisioner::{
    PriestListingProvisioner, ProvisionError, ProvisionOutcome, DEFAULT_LISTING_NAME,
};
pub use repository::{PriestListingRepository, ProfileChangeNotifier};
pub use router::priest_router;
pub use service::{ApprovalOutcome, PriestApplicationService, WorkflowError};
