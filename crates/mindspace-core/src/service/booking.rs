//! Booking service: creating, listing, updating, and cancelling
//! counseling session bookings.

use mindspace_types::booking::{Booking, BookingStatus, BookingUpdate, NewBooking};
use mindspace_types::error::BookingError;
use mindspace_types::user::UserRole;
use tracing::info;

use crate::repository::{BookingRepository, UserRepository};

/// Orchestrates booking lifecycle with participant scoping.
pub struct BookingService<B: BookingRepository, U: UserRepository> {
    booking_repo: B,
    user_repo: U,
}

impl<B: BookingRepository, U: UserRepository> BookingService<B, U> {
    pub fn new(booking_repo: B, user_repo: U) -> Self {
        Self {
            booking_repo,
            user_repo,
        }
    }

    /// Book a session with a psychologist. The target account must exist
    /// and actually hold the psychologist role.
    pub async fn create(
        &self,
        student_id: i64,
        booking: &NewBooking,
    ) -> Result<Booking, BookingError> {
        let psychologist = self
            .user_repo
            .find_by_id(booking.psychologist_id)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        match psychologist {
            Some(user) if user.role == UserRole::Psychologist => {}
            _ => return Err(BookingError::PsychologistNotFound),
        }

        let booking = self.booking_repo.create(student_id, booking).await?;
        info!(
            booking_id = booking.id,
            student_id,
            psychologist_id = booking.psychologist_id,
            "Booking created"
        );
        Ok(booking)
    }

    /// Get a booking by id. `None` covers both "does not exist" and "not
    /// the caller's booking"; the repository scopes by participant.
    pub async fn get(&self, caller_id: i64, id: i64) -> Result<Option<Booking>, BookingError> {
        Ok(self.booking_repo.get_for_user(id, caller_id).await?)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        Ok(self.booking_repo.list_for_user(user_id).await?)
    }

    /// Apply a partial update to a booking the caller participates in.
    pub async fn update(
        &self,
        caller_id: i64,
        id: i64,
        update: &BookingUpdate,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .booking_repo
            .get_for_user(id, caller_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if let Some(date) = &update.date {
            booking.date = date.clone();
        }
        if let Some(time) = &update.time {
            booking.time = time.clone();
        }
        if let Some(duration) = update.duration_minutes {
            booking.duration_minutes = duration;
        }
        if let Some(notes) = &update.notes {
            booking.notes = Some(notes.clone());
        }
        if let Some(status) = update.status {
            booking.status = status;
        }

        self.booking_repo.update(&booking).await?;
        info!(booking_id = booking.id, "Booking updated");
        Ok(booking)
    }

    /// Cancel a booking the caller participates in.
    pub async fn cancel(&self, caller_id: i64, id: i64) -> Result<(), BookingError> {
        let mut booking = self
            .booking_repo
            .get_for_user(id, caller_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        booking.status = BookingStatus::Cancelled;
        self.booking_repo.update(&booking).await?;
        info!(booking_id = booking.id, "Booking cancelled");
        Ok(())
    }
}
