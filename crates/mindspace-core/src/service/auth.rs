//! Account service: registration, login, token resolution, profiles.
//!
//! Generic over `UserRepository`, `PasswordHasher`, and the token seam so
//! the concrete PASETO/argon2/SQLite implementations stay in
//! mindspace-infra.

use mindspace_types::error::{AuthError, RepositoryError};
use mindspace_types::user::{NewUser, ProfileUpdate, Registration, User, UserRole};
use tracing::info;

use crate::auth::{PasswordHasher, TokenIssuer, TokenVerifier};
use crate::repository::UserRepository;

/// Orchestrates account lifecycle and credential checks.
pub struct AuthService<U, H, T> {
    user_repo: U,
    hasher: H,
    tokens: T,
}

impl<U, H, T> AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer + TokenVerifier,
{
    pub fn new(user_repo: U, hasher: H, tokens: T) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Validates the request, hashes the password, and persists the user.
    /// Email uniqueness is checked up front for a friendly error; the
    /// UNIQUE constraint in the store still backstops races.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        validate_registration(&registration)?;

        if self
            .user_repo
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken(registration.email));
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let new_user = NewUser {
            email: registration.email,
            username: registration.username,
            password_hash,
            role: registration.role,
            profile: registration.profile,
        };

        let user = self.user_repo.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(field) if field.contains("username") => {
                AuthError::UsernameTaken(new_user.username.clone())
            }
            RepositoryError::Conflict(_) => AuthError::EmailTaken(new_user.email.clone()),
            other => other.into(),
        })?;

        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Verify credentials and mint an access token.
    ///
    /// Unknown email and wrong password collapse into the same error so the
    /// login endpoint cannot be used to probe for registered addresses.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.email)?;
        info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    /// Resolve a bearer token to the user it identifies.
    ///
    /// The subject claim is an email; a token whose subject no longer
    /// matches a user row is rejected, not treated as anonymous.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        let email = self.tokens.verify(token)?;
        self.user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AuthError> {
        Ok(self.user_repo.find_by_id(id).await?)
    }

    pub async fn list_psychologists(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.user_repo.list_psychologists().await?)
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<User, AuthError> {
        let user = self.user_repo.update_profile(user_id, update).await?;
        info!(user_id, "Profile updated");
        Ok(user)
    }
}

fn validate_registration(registration: &Registration) -> Result<(), AuthError> {
    if !registration.email.contains('@') {
        return Err(AuthError::Validation("invalid email address".to_string()));
    }
    if registration.username.trim().is_empty() {
        return Err(AuthError::Validation("username must not be empty".to_string()));
    }
    if registration.password.len() < 8 {
        return Err(AuthError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if registration.role == UserRole::Psychologist {
        let p = &registration.profile;
        if p.education.is_none()
            || p.specialization.is_none()
            || p.license_number.is_none()
            || p.experience_years.is_none()
        {
            return Err(AuthError::Validation(
                "education, specialization, license_number, and experience_years \
                 are required for psychologists"
                    .to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindspace_types::user::Profile;

    fn registration(role: UserRole) -> Registration {
        Registration {
            email: "a@example.com".to_string(),
            username: "ada".to_string(),
            password: "long-enough".to_string(),
            role,
            profile: Profile::default(),
        }
    }

    #[test]
    fn test_student_registration_valid_without_extras() {
        assert!(validate_registration(&registration(UserRole::Student)).is_ok());
    }

    #[test]
    fn test_psychologist_registration_requires_extras() {
        let err = validate_registration(&registration(UserRole::Psychologist)).unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let mut reg = registration(UserRole::Psychologist);
        reg.profile.education = Some("KNU".to_string());
        reg.profile.specialization = Some("Clinical psychology".to_string());
        reg.profile.license_number = Some("PSY12345".to_string());
        reg.profile.experience_years = Some(5.0);
        assert!(validate_registration(&reg).is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut reg = registration(UserRole::Student);
        reg.password = "short".to_string();
        assert!(matches!(
            validate_registration(&reg),
            Err(AuthError::Validation(_))
        ));
    }
}
