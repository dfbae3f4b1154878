//! SQLite booking repository implementation.

use chrono::Utc;
use mindspace_core::repository::BookingRepository;
use mindspace_types::booking::{Booking, BookingStatus, NewBooking};
use mindspace_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime};

/// SQLite-backed implementation of `BookingRepository`.
pub struct SqliteBookingRepository {
    pool: DatabasePool,
}

impl SqliteBookingRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Booking.
struct BookingRow {
    id: i64,
    student_id: i64,
    psychologist_id: i64,
    date: String,
    time: String,
    duration_minutes: i64,
    status: String,
    notes: Option<String>,
    price: f64,
    created_at: String,
}

impl BookingRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            student_id: row.try_get("student_id")?,
            psychologist_id: row.try_get("psychologist_id")?,
            date: row.try_get("date")?,
            time: row.try_get("time")?,
            duration_minutes: row.try_get("duration_minutes")?,
            status: row.try_get("status")?,
            notes: row.try_get("notes")?,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_booking(self) -> Result<Booking, RepositoryError> {
        let status: BookingStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        Ok(Booking {
            id: self.id,
            student_id: self.student_id,
            psychologist_id: self.psychologist_id,
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes as u32,
            status,
            notes: self.notes,
            price: self.price,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl BookingRepository for SqliteBookingRepository {
    async fn create(
        &self,
        student_id: i64,
        booking: &NewBooking,
    ) -> Result<Booking, RepositoryError> {
        let created_at = Utc::now();
        let status = BookingStatus::default();
        let result = sqlx::query(
            r#"INSERT INTO bookings
               (student_id, psychologist_id, date, time, duration_minutes, status, price, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(student_id)
        .bind(booking.psychologist_id)
        .bind(&booking.date)
        .bind(&booking.time)
        .bind(booking.duration_minutes as i64)
        .bind(status.to_string())
        .bind(booking.price)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Booking {
            id: result.last_insert_rowid(),
            student_id,
            psychologist_id: booking.psychologist_id,
            date: booking.date.clone(),
            time: booking.time.clone(),
            duration_minutes: booking.duration_minutes,
            status,
            notes: None,
            price: booking.price,
            created_at,
        })
    }

    async fn get_for_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM bookings WHERE id = ? AND (student_id = ? OR psychologist_id = ?)",
        )
        .bind(id)
        .bind(user_id)
        .bind(user_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let booking_row =
                    BookingRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(booking_row.into_booking()?))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Booking>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM bookings
               WHERE student_id = ? OR psychologist_id = ?
               ORDER BY date, time, id"#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in &rows {
            let booking_row =
                BookingRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            bookings.push(booking_row.into_booking()?);
        }
        Ok(bookings)
    }

    async fn update(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE bookings SET
               date = ?, time = ?, duration_minutes = ?, status = ?, notes = ?
               WHERE id = ?"#,
        )
        .bind(&booking.date)
        .bind(&booking.time)
        .bind(booking.duration_minutes as i64)
        .bind(booking.status.to_string())
        .bind(&booking.notes)
        .bind(booking.id)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::user::SqliteUserRepository;
    use mindspace_core::repository::UserRepository;
    use mindspace_types::user::{NewUser, Profile, UserRole};

    async fn setup() -> (tempfile::TempDir, SqliteBookingRepository, i64, i64) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();

        let users = SqliteUserRepository::new(pool.clone());
        let student = users
            .create(&NewUser {
                email: "s@example.com".to_string(),
                username: "stud".to_string(),
                password_hash: "h".to_string(),
                role: UserRole::Student,
                profile: Profile::default(),
            })
            .await
            .unwrap();
        let psychologist = users
            .create(&NewUser {
                email: "p@example.com".to_string(),
                username: "psy".to_string(),
                password_hash: "h".to_string(),
                role: UserRole::Psychologist,
                profile: Profile::default(),
            })
            .await
            .unwrap();

        (dir, SqliteBookingRepository::new(pool), student.id, psychologist.id)
    }

    fn new_booking(psychologist_id: i64) -> NewBooking {
        NewBooking {
            psychologist_id,
            date: "2026-09-01".to_string(),
            time: "14:00".to_string(),
            duration_minutes: 50,
            price: 40.0,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_upcoming() {
        let (_dir, repo, student, psychologist) = setup().await;
        let booking = repo.create(student, &new_booking(psychologist)).await.unwrap();

        assert_eq!(booking.status, BookingStatus::Upcoming);
        assert!(booking.notes.is_none());

        let loaded = repo.get_for_user(booking.id, student).await.unwrap().unwrap();
        assert_eq!(loaded.date, "2026-09-01");
        assert_eq!(loaded.duration_minutes, 50);
    }

    #[tokio::test]
    async fn test_get_for_user_scopes_to_participants() {
        let (_dir, repo, student, psychologist) = setup().await;
        let booking = repo.create(student, &new_booking(psychologist)).await.unwrap();

        assert!(repo.get_for_user(booking.id, student).await.unwrap().is_some());
        assert!(repo.get_for_user(booking.id, psychologist).await.unwrap().is_some());
        assert!(repo.get_for_user(booking.id, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_persists_status_and_notes() {
        let (_dir, repo, student, psychologist) = setup().await;
        let mut booking = repo.create(student, &new_booking(psychologist)).await.unwrap();

        booking.status = BookingStatus::Cancelled;
        booking.notes = Some("rescheduling".to_string());
        repo.update(&booking).await.unwrap();

        let loaded = repo.get_for_user(booking.id, student).await.unwrap().unwrap();
        assert_eq!(loaded.status, BookingStatus::Cancelled);
        assert_eq!(loaded.notes.as_deref(), Some("rescheduling"));
    }

    #[tokio::test]
    async fn test_update_unknown_booking() {
        let (_dir, repo, student, psychologist) = setup().await;
        let mut booking = repo.create(student, &new_booking(psychologist)).await.unwrap();
        booking.id = 999;

        let err = repo.update(&booking).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_for_user_ordered_by_date() {
        let (_dir, repo, student, psychologist) = setup().await;
        let mut later = new_booking(psychologist);
        later.date = "2026-10-01".to_string();
        repo.create(student, &later).await.unwrap();
        repo.create(student, &new_booking(psychologist)).await.unwrap();

        let bookings = repo.list_for_user(student).await.unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].date, "2026-09-01");
        assert_eq!(bookings[1].date, "2026-10-01");
    }
}
