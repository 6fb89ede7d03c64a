use super::domain::{PriestStatus, Profile, ProfileUpdate, UserId};

/// Storage seam over the backend profile table so workflows can be
/// exercised against in-memory doubles.
///
/// Contract for implementations: every mutation bumps `updated_at` and
/// returns the updated row, giving callers read-your-writes without a
/// separate refetch.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError>;
    fn list(&self) -> Result<Vec<Profile>, RepositoryError>;
    /// Writes only the `priest_status` column.
    fn set_priest_status(
        &self,
        id: &UserId,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError>;
    /// Writes both role columns in one call.
    fn set_priest_flags(
        &self,
        id: &UserId,
        is_priest: bool,
        status: Option<PriestStatus>,
    ) -> Result<Profile, RepositoryError>;
    /// Self-service edit of name and avatar fields.
    fn update_details(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, RepositoryError>;
}

/// Error enumeration shared by all record stores backed by the same
/// provider.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
