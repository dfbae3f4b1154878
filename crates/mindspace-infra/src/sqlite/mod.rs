//! SQLite repository implementations.
//!
//! All repositories share the split reader/writer [`pool::DatabasePool`]
//! and follow the same shape: raw queries, private Row structs for
//! SQLite-to-domain mapping, RFC 3339 timestamps stored as text.

pub mod booking;
pub mod chat;
pub mod material;
pub mod pool;
pub mod user;

pub use booking::SqliteBookingRepository;
pub use chat::SqliteChatRepository;
pub use material::SqliteMaterialRepository;
pub use pool::{resolve_data_dir, DatabasePool};
pub use user::SqliteUserRepository;

use chrono::{DateTime, Utc};
use mindspace_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Map a sqlx error, turning UNIQUE violations into `Conflict` with the
/// offending constraint text so services can tell email from username.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    if let Some(db_err) = e.as_database_error() {
        let message = db_err.message().to_string();
        if message.contains("UNIQUE constraint failed") {
            return RepositoryError::Conflict(message);
        }
    }
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}
