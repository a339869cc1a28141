//! Locally-issued session tokens.
//!
//! After a successful provider login the API hands the client a short
//! HS256-signed session token. The signing secret comes from configuration
//! and is validated at startup; nothing here is hard-coded.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use godairy_core::OwnerId;

use super::AuthError;

/// Session token lifetime.
const SESSION_DAYS: i64 = 7;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The owner this session belongs to.
    pub sub: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Sign a session token for an owner.
///
/// # Errors
///
/// Returns [`AuthError::TokenIssue`] if signing fails.
pub fn issue(
    owner_id: &OwnerId,
    secret: &SecretString,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = SessionClaims {
        sub: owner_id.as_str().to_owned(),
        iat: now.timestamp(),
        exp: (now + Duration::days(SESSION_DAYS)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|err| {
        tracing::error!(error = %err, "session token signing failed");
        AuthError::TokenIssue
    })
}

/// Verify a session token and return its claims.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] for bad signatures and expired
/// tokens.
pub fn verify(token: &str, secret: &SecretString) -> Result<SessionClaims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);

    jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| {
        tracing::debug!(error = %err, "session token verification failed");
        AuthError::InvalidToken
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kP9#mW2$xQ7!vB4@nF8^zH3&jL6*rT1%")
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let owner_id = OwnerId::generate();
        let now = Utc::now();

        let token = issue(&owner_id, &secret(), now).unwrap();
        let claims = verify(&token, &secret()).unwrap();

        assert_eq!(claims.sub, owner_id.as_str());
        assert_eq!(claims.exp - claims.iat, SESSION_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issue(&OwnerId::generate(), &secret(), Utc::now()).unwrap();
        let other = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6)");

        assert!(matches!(
            verify(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let issued = Utc::now() - Duration::days(SESSION_DAYS + 1);
        let token = issue(&OwnerId::generate(), &secret(), issued).unwrap();

        assert!(matches!(
            verify(&token, &secret()),
            Err(AuthError::InvalidToken)
        ));
    }
}
