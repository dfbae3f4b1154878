//! Auth seams: token verification/issuance and password hashing.
//!
//! Kept as traits so mindspace-core never depends on a concrete token
//! format or hash algorithm; the PASETO and argon2 implementations live in
//! mindspace-infra.

use mindspace_types::error::AuthError;

/// Validates a bearer credential and returns its subject (the user email).
///
/// Every failure mode -- malformed token, bad signature, expired claims,
/// missing subject -- is normalized to [`AuthError::InvalidToken`];
/// verification never panics or leaks format internals.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Mints an access token for a subject.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: &str) -> Result<String, AuthError>;
}

/// Hashes and verifies passwords.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Constant-shape verification: any parse or mismatch is `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
