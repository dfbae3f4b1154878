//! Infrastructure implementations for MindSpace.
//!
//! SQLite repositories (sqlx, split reader/writer pool), PASETO access
//! tokens, and argon2 password hashing. Everything here implements a trait
//! from mindspace-core.

pub mod auth;
pub mod sqlite;
