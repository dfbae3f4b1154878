//! Concrete auth implementations: PASETO access tokens and argon2 hashing.

pub mod password;
pub mod token;

pub use password::ArgonPasswordHasher;
pub use token::PasetoTokens;
