//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;

/// Errors that can occur during authentication operations.
///
/// Verification failures deliberately carry no detail about WHY a token was
/// rejected; the caller only ever sees "invalid token".
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad signature, wrong audience, wrong issuer, or expired token.
    #[error("invalid token")]
    InvalidToken,

    /// No published provider key matches the token's key identifier.
    #[error("no matching signing key")]
    KeyNotFound,

    /// The provider's key set could not be fetched.
    #[error("provider key set unavailable: {0}")]
    KeySetUnavailable(#[from] reqwest::Error),

    /// The verified token is missing a claim we require.
    #[error("token missing required claim: {0}")]
    MissingClaim(&'static str),

    /// The verified email claim is not a usable address.
    #[error("invalid email claim: {0}")]
    InvalidEmailClaim(#[from] godairy_core::EmailError),

    /// Session token could not be signed.
    #[error("failed to issue session token")]
    TokenIssue,

    /// Store failure during identity linking.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
