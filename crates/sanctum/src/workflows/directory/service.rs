use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::workflows::profiles::{
    Actor, PriestStatus, Profile, ProfileRepository, RepositoryError, UserId,
};

/// Substituted when the auth provider cannot produce an email for a row.
/// A single failed lookup must never fail the whole page.
pub const UNKNOWN_EMAIL: &str = "Unknown";

/// Read-only surface of the authentication provider.
pub trait AccountProvider: Send + Sync {
    fn email(&self, user_id: &UserId) -> Result<Option<String>, AccountError>;
}

/// Error raised by auth-provider lookups.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account lookup failed: {0}")]
    Lookup(String),
}

/// One row of the admin user list.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub profile: Profile,
    pub email: String,
}

impl DirectoryEntry {
    fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        let haystacks = [
            self.profile.first_name.as_deref().unwrap_or_default(),
            self.profile.last_name.as_deref().unwrap_or_default(),
            self.email.as_str(),
        ];
        haystacks
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// Role facet for the user list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    #[default]
    All,
    Admins,
    Priests,
    PendingPriests,
}

/// Error raised by the directory read model.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("operation requires an administrator")]
    AdminRequired,
    #[error("profile {0} not found")]
    UnknownUser(UserId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DirectoryError {
    /// HTTP status this error maps to at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::AdminRequired => StatusCode::FORBIDDEN,
            DirectoryError::UnknownUser(_) => StatusCode::NOT_FOUND,
            DirectoryError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            DirectoryError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            DirectoryError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Read model joining the profile store with auth-provider emails.
pub struct UserDirectory<P, A> {
    profiles: Arc<P>,
    accounts: Arc<A>,
}

impl<P, A> UserDirectory<P, A>
where
    P: ProfileRepository + 'static,
    A: AccountProvider + 'static,
{
    pub fn new(profiles: Arc<P>, accounts: Arc<A>) -> Self {
        Self { profiles, accounts }
    }

    /// Resolve a caller identity for authorization checks.
    pub fn actor(&self, user_id: &UserId) -> Result<Actor, DirectoryError> {
        let profile = self
            .profiles
            .fetch(user_id)?
            .ok_or_else(|| DirectoryError::UnknownUser(user_id.clone()))?;
        Ok(profile.actor())
    }

    /// Every profile with its email attached. Per-row lookup failures are
    /// downgraded to the `"Unknown"` placeholder.
    pub fn list_with_email(&self, actor: &Actor) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        if !actor.is_admin {
            return Err(DirectoryError::AdminRequired);
        }

        let profiles = self.profiles.list()?;
        let entries = profiles
            .into_iter()
            .map(|profile| {
                let email = match self.accounts.email(&profile.id) {
                    Ok(Some(email)) => email,
                    Ok(None) => UNKNOWN_EMAIL.to_string(),
                    Err(error) => {
                        warn!(user = %profile.id, error = %error, "email lookup failed");
                        UNKNOWN_EMAIL.to_string()
                    }
                };
                DirectoryEntry { profile, email }
            })
            .collect();
        Ok(entries)
    }
}

/// Pure in-memory facet + search over an already-fetched list; the server
/// never filters.
pub fn filter_entries(
    entries: &[DirectoryEntry],
    filter: RoleFilter,
    search: &str,
) -> Vec<DirectoryEntry> {
    entries
        .iter()
        .filter(|entry| match filter {
            RoleFilter::All => true,
            RoleFilter::Admins => entry.profile.is_admin,
            RoleFilter::Priests => entry.profile.is_priest,
            RoleFilter::PendingPriests => {
                entry.profile.priest_status == Some(PriestStatus::Pending)
            }
        })
        .filter(|entry| entry.matches(search.trim()))
        .cloned()
        .collect()
}
