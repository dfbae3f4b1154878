//! PASETO v4.local access tokens.
//!
//! Tokens are symmetric (the backend both mints and verifies them), carry
//! the user email as subject, and expire after a fixed TTL. The key is
//! derived from the configured secret by hashing it down to 32 bytes.

use std::time::Duration;

use pasetors::{
    claims::{Claims, ClaimsValidationRules},
    keys::SymmetricKey,
    local,
    token::UntrustedToken,
    version4::V4,
    Local,
};
use sha2::{Digest, Sha256};

use mindspace_core::auth::{TokenIssuer, TokenVerifier};
use mindspace_types::error::AuthError;

/// Access token lifetime.
const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Issues and verifies PASETO v4.local access tokens.
pub struct PasetoTokens {
    key: SymmetricKey<V4>,
}

impl PasetoTokens {
    /// Derive the token key from an arbitrary-length secret.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        let key_bytes: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        let key = SymmetricKey::<V4>::from(&key_bytes)
            .map_err(|e| AuthError::Token(format!("token key init failed: {e}")))?;
        Ok(Self { key })
    }
}

impl TokenIssuer for PasetoTokens {
    fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let mut claims = Claims::new_expires_in(&ACCESS_TOKEN_TTL)
            .map_err(|e| AuthError::Token(format!("claims init failed: {e}")))?;
        claims
            .subject(subject)
            .map_err(|e| AuthError::Token(format!("claim sub failed: {e}")))?;

        local::encrypt(&self.key, &claims, None, None)
            .map_err(|e| AuthError::Token(format!("token mint failed: {e}")))
    }
}

impl TokenVerifier for PasetoTokens {
    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let untrusted =
            UntrustedToken::<Local, V4>::try_from(token).map_err(|_| AuthError::InvalidToken)?;
        let rules = ClaimsValidationRules::new();
        let trusted = local::decrypt(&self.key, &untrusted, &rules, None, None)
            .map_err(|_| AuthError::InvalidToken)?;

        trusted
            .payload_claims()
            .and_then(|claims| claims.get_claim("sub"))
            .and_then(|sub| sub.as_str())
            .map(str::to_string)
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = PasetoTokens::new("test-secret").unwrap();
        let token = tokens.issue("ada@example.com").unwrap();
        let subject = tokens.verify(&token).unwrap();
        assert_eq!(subject, "ada@example.com");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = PasetoTokens::new("test-secret").unwrap();
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let issuer = PasetoTokens::new("secret-a").unwrap();
        let verifier = PasetoTokens::new("secret-b").unwrap();
        let token = issuer.issue("ada@example.com").unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_same_secret_gives_interchangeable_keys() {
        let a = PasetoTokens::new("shared").unwrap();
        let b = PasetoTokens::new("shared").unwrap();
        let token = a.issue("ada@example.com").unwrap();
        assert_eq!(b.verify(&token).unwrap(), "ada@example.com");
    }
}
