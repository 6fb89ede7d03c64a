use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper shared with the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stage of a user's priest application. Absent entirely when the user
/// never applied (or was revoked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriestStatus {
    Pending,
    Approved,
    Rejected,
}

impl PriestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PriestStatus::Pending => "pending",
            PriestStatus::Approved => "approved",
            PriestStatus::Rejected => "rejected",
        }
    }
}

/// Stored record of a registered user's role flags and personal info.
///
/// The invariants `is_priest => priest_status == approved` and
/// `priest_status == pending => !is_priest` are maintained only by the
/// workflow functions, never by the store itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub is_priest: bool,
    pub priest_status: Option<PriestStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile with default flags, as the auth provider's sign-in
    /// trigger would create it.
    pub fn new(id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            first_name: None,
            last_name: None,
            avatar_url: None,
            is_admin: false,
            is_priest: false,
            priest_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name assembled from whichever name parts are present.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .first_name
            .as_deref()
            .into_iter()
            .chain(self.last_name.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Self-service profile edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.avatar_url.is_none()
    }
}

/// Caller identity that every workflow operation authorizes against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub is_admin: bool,
}
