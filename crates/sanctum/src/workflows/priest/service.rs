use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    ApplicationStatusView, ListingUpdate, PriestListing, ProfileChange,
};
use super::provisioner::{PriestListingProvisioner, ProvisionError};
use super::repository::{PriestListingRepository, ProfileChangeNotifier};
use crate::workflows::profiles::{
    Actor, PriestStatus, Profile, ProfileRepository, RepositoryError, UserId,
};

/// Service mediating the three-state priest-approval lifecycle. The single
/// authoritative implementation of submit/approve/reject/revoke; dashboards
/// and the API layer never touch the flag columns directly.
pub struct PriestApplicationService<P, L, N> {
    profiles: Arc<P>,
    listings: Arc<L>,
    provisioner: PriestListingProvisioner<P, L>,
    notifier: Arc<N>,
}

/// Result of a successful approval: the updated profile plus the listing
/// the provisioner guaranteed.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    pub profile: Profile,
    pub listing: PriestListing,
    pub listing_created: bool,
}

/// Error raised by the application workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("operation requires an administrator")]
    AdminRequired,
    #[error("applications may only be submitted for one's own profile")]
    SelfServiceOnly,
    #[error("profile {0} not found")]
    ProfileNotFound(UserId),
    #[error("no listing exists for {0}")]
    ListingNotFound(UserId),
    #[error("listing could not be provisioned and the profile flags were rolled back: {source}")]
    ProvisionFailed {
        #[source]
        source: ProvisionError,
    },
    #[error(
        "listing provisioning failed ({provision}) and the compensating rollback also \
         failed ({rollback}); profile {user_id} may carry approved flags without a listing"
    )]
    RollbackFailed {
        user_id: UserId,
        provision: ProvisionError,
        rollback: RepositoryError,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl WorkflowError {
    /// HTTP status this error maps to at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::AdminRequired | WorkflowError::SelfServiceOnly => StatusCode::FORBIDDEN,
            WorkflowError::ProfileNotFound(_) | WorkflowError::ListingNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            WorkflowError::ProvisionFailed { .. } | WorkflowError::RollbackFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            WorkflowError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            WorkflowError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            WorkflowError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl<P, L, N> PriestApplicationService<P, L, N>
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    pub fn new(profiles: Arc<P>, listings: Arc<L>, notifier: Arc<N>) -> Self {
        let provisioner = PriestListingProvisioner::new(profiles.clone(), listings.clone());
        Self {
            profiles,
            listings,
            provisioner,
            notifier,
        }
    }

    /// Resolve a caller identity for authorization checks.
    pub fn actor(&self, user_id: &UserId) -> Result<Actor, WorkflowError> {
        let profile = self
            .profiles
            .fetch(user_id)?
            .ok_or_else(|| WorkflowError::ProfileNotFound(user_id.clone()))?;
        Ok(profile.actor())
    }

    /// A user applies to become a priest: their own `priest_status` moves
    /// to pending. There is deliberately no re-submission guard; applying
    /// while already pending or approved silently rewrites the column,
    /// matching shipped behavior.
    pub fn submit_application(
        &self,
        actor: &Actor,
        user_id: &UserId,
    ) -> Result<Profile, WorkflowError> {
        if actor.user_id != *user_id {
            return Err(WorkflowError::SelfServiceOnly);
        }

        self.profiles
            .fetch(user_id)?
            .ok_or_else(|| WorkflowError::ProfileNotFound(user_id.clone()))?;

        let updated = self
            .profiles
            .set_priest_status(user_id, Some(PriestStatus::Pending))?;
        info!(user = %user_id, "priest application submitted");
        self.notifier
            .profile_changed(user_id, ProfileChange::ApplicationSubmitted);
        Ok(updated)
    }

    /// Admin approval: set both role columns, then guarantee the public
    /// listing exists. The store cannot span both writes in one
    /// transaction, so a provisioning failure triggers a compensating
    /// rollback restoring the pre-approval flags; callers see a single
    /// error either way.
    pub fn approve(
        &self,
        actor: &Actor,
        user_id: &UserId,
    ) -> Result<ApprovalOutcome, WorkflowError> {
        self.require_admin(actor)?;

        let before = self
            .profiles
            .fetch(user_id)?
            .ok_or_else(|| WorkflowError::ProfileNotFound(user_id.clone()))?;

        let profile =
            self.profiles
                .set_priest_flags(user_id, true, Some(PriestStatus::Approved))?;

        match self.provisioner.ensure_listing(user_id) {
            Ok(outcome) => {
                info!(
                    user = %user_id,
                    listing_created = outcome.was_created(),
                    "priest application approved"
                );
                self.notifier
                    .profile_changed(user_id, ProfileChange::PriestApproved);
                Ok(ApprovalOutcome {
                    profile,
                    listing_created: outcome.was_created(),
                    listing: outcome.into_listing(),
                })
            }
            Err(provision) => {
                warn!(user = %user_id, error = %provision, "listing provisioning failed, rolling back flags");
                match self
                    .profiles
                    .set_priest_flags(user_id, before.is_priest, before.priest_status)
                {
                    Ok(_) => Err(WorkflowError::ProvisionFailed { source: provision }),
                    Err(rollback) => Err(WorkflowError::RollbackFailed {
                        user_id: user_id.clone(),
                        provision,
                        rollback,
                    }),
                }
            }
        }
    }

    /// Admin rejection: `priest_status = rejected`, `is_priest = false`.
    /// No listing side effect.
    pub fn reject(&self, actor: &Actor, user_id: &UserId) -> Result<Profile, WorkflowError> {
        self.require_admin(actor)?;

        self.profiles
            .fetch(user_id)?
            .ok_or_else(|| WorkflowError::ProfileNotFound(user_id.clone()))?;

        let updated =
            self.profiles
                .set_priest_flags(user_id, false, Some(PriestStatus::Rejected))?;
        info!(user = %user_id, "priest application rejected");
        self.notifier
            .profile_changed(user_id, ProfileChange::PriestRejected);
        Ok(updated)
    }

    /// Admin revocation: both role columns cleared regardless of prior
    /// status. Any existing listing stays behind; the orphan matches
    /// shipped behavior and is covered by tests.
    pub fn revoke(&self, actor: &Actor, user_id: &UserId) -> Result<Profile, WorkflowError> {
        self.require_admin(actor)?;

        self.profiles
            .fetch(user_id)?
            .ok_or_else(|| WorkflowError::ProfileNotFound(user_id.clone()))?;

        let updated = self.profiles.set_priest_flags(user_id, false, None)?;
        info!(user = %user_id, "priest status revoked");
        self.notifier
            .profile_changed(user_id, ProfileChange::PriestRevoked);
        Ok(updated)
    }

    /// Read model for dashboard gating: current flags plus the listing id
    /// when one exists.
    pub fn application_status(
        &self,
        user_id: &UserId,
    ) -> Result<ApplicationStatusView, WorkflowError> {
        let profile = self
            .profiles
            .fetch(user_id)?
            .ok_or_else(|| WorkflowError::ProfileNotFound(user_id.clone()))?;
        let listing_id = self
            .listings
            .fetch_by_user(user_id)?
            .map(|listing| listing.id);
        Ok(ApplicationStatusView::from_profile(&profile, listing_id))
    }

    /// Fetch the public listing for a priest's page.
    pub fn listing_for_user(&self, user_id: &UserId) -> Result<PriestListing, WorkflowError> {
        self.listings
            .fetch_by_user(user_id)?
            .ok_or_else(|| WorkflowError::ListingNotFound(user_id.clone()))
    }

    /// Self-service edit of the priest's own listing; admins may edit any
    /// listing.
    pub fn update_listing(
        &self,
        actor: &Actor,
        user_id: &UserId,
        update: ListingUpdate,
    ) -> Result<PriestListing, WorkflowError> {
        if actor.user_id != *user_id && !actor.is_admin {
            return Err(WorkflowError::SelfServiceOnly);
        }

        let mut listing = self
            .listings
            .fetch_by_user(user_id)?
            .ok_or_else(|| WorkflowError::ListingNotFound(user_id.clone()))?;

        listing.apply(update, Utc::now());
        self.listings.update(listing.clone())?;
        self.notifier
            .profile_changed(user_id, ProfileChange::ListingEdited);
        Ok(listing)
    }

    fn require_admin(&self, actor: &Actor) -> Result<(), WorkflowError> {
        if actor.is_admin {
            Ok(())
        } else {
            Err(WorkflowError::AdminRequired)
        }
    }
}
