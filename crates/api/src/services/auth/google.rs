//! Google ID-token verification.

use jsonwebtoken::Algorithm;
use serde::Deserialize;

use godairy_core::{AuthProvider, Email};

use super::jwks::{self, JwksClient};
use super::{AuthError, IdentityClaim};

/// Google's published signing keys.
const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuers Google uses for ID tokens; both spellings are in the wild.
const GOOGLE_ISSUERS: &[&str] = &["https://accounts.google.com", "accounts.google.com"];

/// Claims we read from a verified Google ID token.
#[derive(Debug, Deserialize)]
struct GoogleClaims {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Verifies Google-issued ID tokens against the configured OAuth client ID.
pub struct GoogleVerifier {
    jwks: JwksClient,
    client_id: String,
}

impl GoogleVerifier {
    /// Create a verifier for the given OAuth client ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the key-set HTTP client cannot be built.
    pub fn new(client_id: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            jwks: JwksClient::new(GOOGLE_JWKS_URL)?,
            client_id: client_id.into(),
        })
    }

    /// Verify a Google ID token and extract the normalized identity claim.
    ///
    /// Pure validate-and-extract; no state is mutated. The only side effect
    /// is the (cached) fetch of Google's public keys.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for any verification failure,
    /// [`AuthError::KeyNotFound`] when the token's key ID is not in Google's
    /// published set, and [`AuthError::KeySetUnavailable`] when the set
    /// cannot be fetched.
    pub async fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        let kid = jwks::token_kid(token)?;
        let key = self.jwks.key_for(&kid).await?;

        let claims: GoogleClaims = jwks::decode_verified(
            token,
            &key,
            Algorithm::RS256,
            &self.client_id,
            GOOGLE_ISSUERS,
        )?;

        let email = claims.email.ok_or(AuthError::MissingClaim("email"))?;
        let name = claims.name.ok_or(AuthError::MissingClaim("name"))?;

        Ok(IdentityClaim {
            email: Email::parse(&email)?,
            name,
            picture: claims.picture,
            provider: AuthProvider::Google,
        })
    }
}
