//! BookingRepository trait definition.

use mindspace_types::booking::{Booking, NewBooking};
use mindspace_types::error::RepositoryError;

/// Repository trait for session booking persistence.
pub trait BookingRepository: Send + Sync {
    /// Create a booking for a student with a psychologist.
    fn create(
        &self,
        student_id: i64,
        booking: &NewBooking,
    ) -> impl std::future::Future<Output = Result<Booking, RepositoryError>> + Send;

    /// Get a booking by id, scoped to bookings the user participates in.
    fn get_for_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;

    /// List all bookings where the user is either participant.
    fn list_for_user(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    /// Persist an updated booking (date, time, notes, status).
    fn update(
        &self,
        booking: &Booking,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
