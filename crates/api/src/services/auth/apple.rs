//! Apple identity-token verification.

use jsonwebtoken::Algorithm;
use serde::Deserialize;

use godairy_core::{AuthProvider, Email};

use super::jwks::{self, JwksClient};
use super::{AuthError, IdentityClaim};

/// Apple's published signing keys.
const APPLE_JWKS_URL: &str = "https://appleid.apple.com/auth/keys";

/// Issuer Apple uses for identity tokens.
const APPLE_ISSUERS: &[&str] = &["https://appleid.apple.com"];

/// Claims we read from a verified Apple identity token.
///
/// Apple only includes `email` reliably; there is no display name in the
/// token, so the email's local part stands in as the name.
#[derive(Debug, Deserialize)]
struct AppleClaims {
    email: Option<String>,
}

/// Verifies Apple-issued identity tokens against the configured bundle ID.
pub struct AppleVerifier {
    jwks: JwksClient,
    bundle_id: String,
}

impl AppleVerifier {
    /// Create a verifier for the given app bundle identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the key-set HTTP client cannot be built.
    pub fn new(bundle_id: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            jwks: JwksClient::new(APPLE_JWKS_URL)?,
            bundle_id: bundle_id.into(),
        })
    }

    /// Verify an Apple identity token and extract the normalized identity
    /// claim.
    ///
    /// Pure validate-and-extract; no state is mutated. The only side effect
    /// is the (cached) fetch of Apple's public keys.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for any verification failure,
    /// [`AuthError::KeyNotFound`] when the token's key ID is not in Apple's
    /// published set, and [`AuthError::KeySetUnavailable`] when the set
    /// cannot be fetched.
    pub async fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        let kid = jwks::token_kid(token)?;
        let key = self.jwks.key_for(&kid).await?;

        let claims: AppleClaims = jwks::decode_verified(
            token,
            &key,
            Algorithm::RS256,
            &self.bundle_id,
            APPLE_ISSUERS,
        )?;

        let email = claims.email.ok_or(AuthError::MissingClaim("email"))?;
        let email = Email::parse(&email)?;
        let name = email.as_str().split('@').next().unwrap_or_default().to_owned();

        Ok(IdentityClaim {
            email,
            name,
            picture: None,
            provider: AuthProvider::Apple,
        })
    }
}
