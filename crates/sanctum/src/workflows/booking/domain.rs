use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::priest::ListingId;
use crate::workflows::profiles::UserId;

/// Identifier wrapper for bookings of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a catalogued temple service (puja, havan, consultation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Booking lifecycle. Any status may move to any other; no state machine
/// is enforced at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// A user's request to engage a specific priest at a time and place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriestBooking {
    pub id: BookingId,
    pub user_id: UserId,
    pub priest_id: ListingId,
    pub booking_date: DateTime<Utc>,
    pub purpose: String,
    pub address: String,
    pub notes: Option<String>,
    /// Currency-agnostic price agreed at booking time.
    pub price: u32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking for a catalogued temple service rather than a named priest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBooking {
    pub id: BookingId,
    pub user_id: UserId,
    pub service_id: ServiceId,
    pub booking_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intake payload for a priest booking; `user_id` comes from the caller
/// identity, never the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriestBookingRequest {
    pub priest_id: ListingId,
    pub booking_date: DateTime<Utc>,
    pub purpose: String,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub price: u32,
}

/// Intake payload for a service booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceBookingRequest {
    pub service_id: ServiceId,
    pub booking_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Combined read model for a user's booking history.
#[derive(Debug, Clone, Serialize)]
pub struct UserBookings {
    pub priest_bookings: Vec<PriestBooking>,
    pub service_bookings: Vec<ServiceBooking>,
}
