//! Counseling session booking types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a booking.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('upcoming', 'completed', 'cancelled'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Upcoming => write!(f, "upcoming"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(BookingStatus::Upcoming),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("invalid booking status: '{other}'")),
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Upcoming
    }
}

/// A booked counseling session between a student and a psychologist.
///
/// `date` is an ISO date ("YYYY-MM-DD") and `time` is "HH:MM", both kept as
/// text: bookings record what the two parties agreed on, not an instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub student_id: i64,
    pub psychologist_id: i64,
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whether `user_id` is one of the two participants.
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.student_id == user_id || self.psychologist_id == user_id
    }
}

/// Data required to create a booking. The student id comes from the
/// authenticated caller, never from the request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub psychologist_id: i64,
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub price: f64,
}

/// Partial booking update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingUpdate {
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
    pub status: Option<BookingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_roundtrip() {
        for status in [
            BookingStatus::Upcoming,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let s = status.to_string();
            let parsed: BookingStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_booking_status_serde() {
        let json = serde_json::to_string(&BookingStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_booking_status_default() {
        assert_eq!(BookingStatus::default(), BookingStatus::Upcoming);
    }
}
