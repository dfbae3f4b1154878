//! User account types.
//!
//! A user is either a student or a psychologist. Psychologists carry
//! additional credential fields (education, specialization, license,
//! experience) that are absent for students.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Role of a user account.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('student', 'psychologist'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Psychologist,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => write!(f, "student"),
            UserRole::Psychologist => write!(f, "psychologist"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "psychologist" => Ok(UserRole::Psychologist),
            other => Err(format!("invalid user role: '{other}'")),
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}

/// A registered user account.
///
/// `password_hash` never leaves the backend; the HTTP layer serializes
/// users through [`UserProfile`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
}

/// Profile fields shared by both roles, plus psychologist-only extras.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: Option<String>,
    /// Psychologist-only fields.
    pub education: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub experience_years: Option<f64>,
}

/// Outward-facing view of a user, safe to serialize in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    #[serde(flatten)]
    pub profile: Profile,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            profile: user.profile.clone(),
        }
    }
}

/// Data required to create a user. The password is already hashed by the
/// time it reaches a repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile: Profile,
}

/// Registration request: plaintext password, hashed by the auth service
/// before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub education: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub experience_years: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Student, UserRole::Psychologist] {
            let s = role.to_string();
            let parsed: UserRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_user_role_serde() {
        let json = serde_json::to_string(&UserRole::Psychologist).unwrap();
        assert_eq!(json, "\"psychologist\"");
        let parsed: UserRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, UserRole::Psychologist);
    }

    #[test]
    fn test_user_profile_flattens_profile_fields() {
        let user = User {
            id: 7,
            email: "a@example.com".to_string(),
            username: "a".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: UserRole::Student,
            is_active: true,
            created_at: Utc::now(),
            profile: Profile {
                first_name: Some("Ada".to_string()),
                ..Profile::default()
            },
        };
        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert_eq!(json["first_name"], "Ada");
        assert!(json.get("password_hash").is_none());
    }
}
