//! Booking store: priest engagements and general service bookings with a
//! pending/confirmed/completed/cancelled lifecycle. Single-row CRUD; status
//! transitions are deliberately unconstrained, matching shipped behavior.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    BookingId, BookingStatus, PriestBooking, PriestBookingRequest, ServiceBooking,
    ServiceBookingRequest, ServiceId, UserBookings,
};
pub use repository::{PriestBookingRepository, ServiceBookingRepository};
pub use router::booking_router;
pub use service::{BookingError, BookingService};
