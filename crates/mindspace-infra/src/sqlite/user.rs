//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `mindspace-core`: raw queries, a
//! private Row struct for SQLite-to-domain mapping, split reader/writer
//! pool usage.

use chrono::{NaiveDate, Utc};
use mindspace_core::repository::UserRepository;
use mindspace_types::error::RepositoryError;
use mindspace_types::user::{NewUser, Profile, ProfileUpdate, User, UserRole};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password_hash: String,
    role: String,
    is_active: i64,
    created_at: String,
    first_name: Option<String>,
    last_name: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    birth_date: Option<String>,
    phone_number: Option<String>,
    education: Option<String>,
    specialization: Option<String>,
    license_number: Option<String>,
    experience_years: Option<f64>,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            role: row.try_get("role")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            bio: row.try_get("bio")?,
            avatar_url: row.try_get("avatar_url")?,
            birth_date: row.try_get("birth_date")?,
            phone_number: row.try_get("phone_number")?,
            education: row.try_get("education")?,
            specialization: row.try_get("specialization")?,
            license_number: row.try_get("license_number")?,
            experience_years: row.try_get("experience_years")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let role: UserRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;
        let birth_date = self
            .birth_date
            .as_deref()
            .map(parse_date)
            .transpose()?;

        Ok(User {
            id: self.id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            role,
            is_active: self.is_active != 0,
            created_at,
            profile: Profile {
                first_name: self.first_name,
                last_name: self.last_name,
                bio: self.bio,
                avatar_url: self.avatar_url,
                birth_date,
                phone_number: self.phone_number,
                education: self.education,
                specialization: self.specialization,
                license_number: self.license_number,
                experience_years: self.experience_years,
            },
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Query(format!("invalid date: {e}")))
}

fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

impl SqliteUserRepository {
    async fn fetch_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let created_at = Utc::now();
        let p = &user.profile;

        let result = sqlx::query(
            r#"INSERT INTO users
               (email, username, password_hash, role, is_active, created_at,
                first_name, last_name, bio, avatar_url, birth_date, phone_number,
                education, specialization, license_number, experience_years)
               VALUES (?, ?, ?, ?, 1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(format_datetime(&created_at))
        .bind(&p.first_name)
        .bind(&p.last_name)
        .bind(&p.bio)
        .bind(&p.avatar_url)
        .bind(p.birth_date.as_ref().map(format_date))
        .bind(&p.phone_number)
        .bind(&p.education)
        .bind(&p.specialization)
        .bind(&p.license_number)
        .bind(p.experience_years)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        let id = result.last_insert_rowid();
        Ok(User {
            id,
            email: user.email.clone(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            is_active: true,
            created_at,
            profile: user.profile.clone(),
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        self.fetch_by_id(id).await
    }

    async fn list_psychologists(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM users WHERE role = 'psychologist' ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            let user_row =
                UserRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            users.push(user_row.into_user()?);
        }
        Ok(users)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE users SET
               first_name = COALESCE(?, first_name),
               last_name = COALESCE(?, last_name),
               bio = COALESCE(?, bio),
               avatar_url = COALESCE(?, avatar_url),
               birth_date = COALESCE(?, birth_date),
               phone_number = COALESCE(?, phone_number),
               education = COALESCE(?, education),
               specialization = COALESCE(?, specialization),
               license_number = COALESCE(?, license_number),
               experience_years = COALESCE(?, experience_years)
               WHERE id = ?"#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.bio)
        .bind(&update.avatar_url)
        .bind(update.birth_date.as_ref().map(format_date))
        .bind(&update.phone_number)
        .bind(&update.education)
        .bind(&update.specialization)
        .bind(&update.license_number)
        .bind(update.experience_years)
        .bind(user_id)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.fetch_by_id(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> (tempfile::TempDir, SqliteUserRepository) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteUserRepository::new(pool))
    }

    fn new_user(email: &str, username: &str, role: UserRole) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "$argon2id$test".to_string(),
            role,
            profile: Profile {
                first_name: Some("Ada".to_string()),
                ..Profile::default()
            },
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let (_dir, repo) = repo().await;
        let created = repo
            .create(&new_user("a@example.com", "ada", UserRole::Student))
            .await
            .unwrap();

        let found = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "ada");
        assert_eq!(found.role, UserRole::Student);
        assert_eq!(found.profile.first_name.as_deref(), Some("Ada"));
        assert!(repo.find_by_email("missing@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (_dir, repo) = repo().await;
        repo.create(&new_user("a@example.com", "ada", UserRole::Student))
            .await
            .unwrap();

        let err = repo
            .create(&new_user("a@example.com", "other", UserRole::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(msg) if msg.contains("email")));
    }

    #[tokio::test]
    async fn test_list_psychologists_filters_by_role() {
        let (_dir, repo) = repo().await;
        repo.create(&new_user("s@example.com", "stud", UserRole::Student))
            .await
            .unwrap();
        repo.create(&new_user("p@example.com", "psy", UserRole::Psychologist))
            .await
            .unwrap();

        let psychologists = repo.list_psychologists().await.unwrap();
        assert_eq!(psychologists.len(), 1);
        assert_eq!(psychologists[0].email, "p@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_leaves_unset_fields() {
        let (_dir, repo) = repo().await;
        let user = repo
            .create(&new_user("a@example.com", "ada", UserRole::Student))
            .await
            .unwrap();

        let updated = repo
            .update_profile(
                user.id,
                &ProfileUpdate {
                    bio: Some("hello".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.profile.bio.as_deref(), Some("hello"));
        assert_eq!(updated.profile.first_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let (_dir, repo) = repo().await;
        let err = repo
            .update_profile(999, &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
