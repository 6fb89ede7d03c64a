use super::domain::{BookingId, BookingStatus, PriestBooking, ServiceBooking, ServiceId};
use crate::workflows::priest::ListingId;
use crate::workflows::profiles::{RepositoryError, UserId};

/// Storage seam over the priest-booking table.
///
/// `update_status` must touch only the status column and `updated_at`,
/// returning the updated row.
pub trait PriestBookingRepository: Send + Sync {
    fn insert(&self, booking: PriestBooking) -> Result<PriestBooking, RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<PriestBooking>, RepositoryError>;
    fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<PriestBooking, RepositoryError>;
    fn for_user(&self, user_id: &UserId) -> Result<Vec<PriestBooking>, RepositoryError>;
    fn for_priest(&self, priest_id: &ListingId) -> Result<Vec<PriestBooking>, RepositoryError>;
}

/// Storage seam over the service-booking table; same contract.
pub trait ServiceBookingRepository: Send + Sync {
    fn insert(&self, booking: ServiceBooking) -> Result<ServiceBooking, RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<ServiceBooking>, RepositoryError>;
    fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<ServiceBooking, RepositoryError>;
    fn for_user(&self, user_id: &UserId) -> Result<Vec<ServiceBooking>, RepositoryError>;
    fn for_service(&self, service_id: &ServiceId) -> Result<Vec<ServiceBooking>, RepositoryError>;
}
