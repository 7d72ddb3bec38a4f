//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the principal id and email. The signing
//! secret and lifetime come from configuration at construction.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use mercadito_core::UserId;

use super::AuthError;
use crate::models::User;

/// The signed claim embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's id.
    pub sub: String,
    /// Principal's email at issuance time.
    pub email: String,
    /// Issued-at timestamp (Unix).
    pub iat: i64,
    /// Expiration timestamp (Unix).
    pub exp: i64,
}

impl Claims {
    /// The user ID the token claims, if `sub` parses.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse::<i32>().ok().map(UserId::new)
    }
}

/// Issues and verifies bearer tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from an externally supplied signing secret and TTL.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // 30 second clock skew tolerance

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for a principal, expiring after the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenSigning)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any verification failure:
    /// malformed input, bad signature, or an expired claim.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mercadito_core::{Email, Role};

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(&SecretString::from("0123456789abcdef0123456789abcdef"), 24)
    }

    fn test_user() -> User {
        User {
            id: UserId::new(7),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            email: Email::parse("ana@example.com").unwrap(),
            age: 30,
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            cart: None,
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let issuer = test_issuer();
        let token = issuer.issue(&test_user()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user_id(), Some(UserId::new(7)));
        assert_eq!(claims.email, "ana@example.com");
        assert!(claims.exp > claims.iat);
        // 24 hour TTL
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = test_issuer();

        // Craft a token whose expiry is well past the verification leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "7".to_string(),
            email: "ana@example.com".to_string(),
            iat: now - 3600,
            exp: now - 600,
        };
        let token = encode(&Header::default(), &claims, &issuer.encoding_key).unwrap();

        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let issuer = test_issuer();
        let token = issuer.issue(&test_user()).unwrap();

        // Flip the last character of the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            issuer.verify(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = test_issuer();
        let other = TokenIssuer::new(&SecretString::from("fedcba9876543210fedcba9876543210"), 24);

        let token = issuer.issue(&test_user()).unwrap();
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let issuer = test_issuer();
        assert!(matches!(
            issuer.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(issuer.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_claims_user_id_parsing() {
        let claims = Claims {
            sub: "41".to_string(),
            email: "x@y.z".to_string(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.user_id(), Some(UserId::new(41)));

        let bad = Claims {
            sub: "not-a-number".to_string(),
            email: "x@y.z".to_string(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(bad.user_id(), None);
    }
}
