use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::profiles::{Profile, UserId};

/// Identifier wrapper for public priest listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public-facing listing record for an approved priest. At most one per
/// user; revocation leaves it in place (the orphan is deliberate, matching
/// shipped behavior).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriestListing {
    pub id: ListingId,
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub specialties: Vec<String>,
    pub experience_years: u16,
    pub avatar_url: String,
    /// Currency-agnostic base price for an engagement.
    pub base_price: u32,
    pub availability: String,
    pub location: String,
    pub rating: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriestListing {
    /// Apply a self-service edit; `None` fields are left untouched.
    pub fn apply(&mut self, update: ListingUpdate, at: DateTime<Utc>) {
        let ListingUpdate {
            name,
            description,
            specialties,
            experience_years,
            avatar_url,
            base_price,
            availability,
            location,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(specialties) = specialties {
            self.specialties = specialties;
        }
        if let Some(experience_years) = experience_years {
            self.experience_years = experience_years;
        }
        if let Some(avatar_url) = avatar_url {
            self.avatar_url = avatar_url;
        }
        if let Some(base_price) = base_price {
            self.base_price = base_price;
        }
        if let Some(availability) = availability {
            self.availability = availability;
        }
        if let Some(location) = location {
            self.location = location;
        }
        self.updated_at = at;
    }
}

/// Self-service edit payload for a priest's own listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub experience_years: Option<u16>,
    pub avatar_url: Option<String>,
    pub base_price: Option<u32>,
    pub availability: Option<String>,
    pub location: Option<String>,
}

/// Sanitized application state exposed to dashboards and gating checks.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priest_status: Option<&'static str>,
    pub is_priest: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ListingId>,
}

impl ApplicationStatusView {
    pub fn from_profile(profile: &Profile, listing_id: Option<ListingId>) -> Self {
        Self {
            user_id: profile.id.clone(),
            priest_status: profile.priest_status.map(|status| status.label()),
            is_priest: profile.is_priest,
            listing_id,
        }
    }
}

/// What changed on a profile, handed to dependents after each successful
/// workflow write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileChange {
    ApplicationSubmitted,
    PriestApproved,
    PriestRejected,
    PriestRevoked,
    ListingEdited,
}

impl ProfileChange {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileChange::ApplicationSubmitted => "application_submitted",
            ProfileChange::PriestApproved => "priest_approved",
            ProfileChange::PriestRejected => "priest_rejected",
            ProfileChange::PriestRevoked => "priest_revoked",
            ProfileChange::ListingEdited => "listing_edited",
        }
    }
}
