//! Profile store: the per-user record of role flags and personal info,
//! read and written by every other workflow.

pub mod domain;
pub mod repository;

pub use domain::{Actor, PriestStatus, Profile, ProfileUpdate, UserId};
pub use repository::{ProfileRepository, RepositoryError};
