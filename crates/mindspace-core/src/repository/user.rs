//! UserRepository trait definition.

use mindspace_types::error::RepositoryError;
use mindspace_types::user::{NewUser, ProfileUpdate, User};

/// Repository trait for user account persistence.
///
/// Implementations live in mindspace-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Conflict` if the email or username
    /// is already taken.
    fn create(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by email (the token subject).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by id.
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// List all psychologist accounts.
    fn list_psychologists(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    /// Apply a partial profile update, returning the updated user.
    fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;
}
