//! Provider key-set (JWKS) fetching and token decoding.
//!
//! Both identity providers publish their signing keys as a JSON Web Key Set.
//! The client here fetches the set over HTTPS with a short timeout, caches it
//! by key ID for a TTL, and converts the matching key into a
//! [`DecodingKey`]. Key fetches fail fast rather than hang a login request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::AuthError;

/// Timeout for outbound key-set fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a fetched key stays cached.
const KEY_TTL_SECONDS: i64 = 3600;

/// A JSON Web Key Set as published by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// A single JSON Web Key (RSA members only; both providers sign with RS256).
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    #[serde(rename = "kty")]
    pub key_type: String,
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
    #[serde(rename = "n")]
    pub modulus: Option<String>,
    #[serde(rename = "e")]
    pub exponent: Option<String>,
}

impl Jwks {
    /// Find the key matching a token header's key identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::KeyNotFound`] when no published key matches.
    pub fn find(&self, kid: &str) -> Result<&Jwk, AuthError> {
        self.keys
            .iter()
            .find(|k| k.key_id.as_deref() == Some(kid))
            .ok_or(AuthError::KeyNotFound)
    }
}

/// Convert a JWK into a [`DecodingKey`].
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] for non-RSA keys or malformed
/// components; the detail is logged, never surfaced.
pub fn decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    if jwk.key_type != "RSA" {
        tracing::debug!(kty = %jwk.key_type, "unsupported provider key type");
        return Err(AuthError::InvalidToken);
    }

    let n = jwk.modulus.as_ref().ok_or(AuthError::InvalidToken)?;
    let e = jwk.exponent.as_ref().ok_or(AuthError::InvalidToken)?;

    DecodingKey::from_rsa_components(n, e).map_err(|err| {
        tracing::debug!(error = %err, "failed to build RSA decoding key");
        AuthError::InvalidToken
    })
}

#[derive(Clone)]
struct CachedKey {
    key: DecodingKey,
    expires_at: DateTime<Utc>,
}

/// Caching JWKS client for one provider endpoint.
pub struct JwksClient {
    http: reqwest::Client,
    url: String,
    cache: Arc<RwLock<HashMap<String, CachedKey>>>,
}

impl JwksClient {
    /// Create a client for a provider's JWKS endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(Self {
            http,
            url: url.into(),
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Get the decoding key for a key identifier, fetching the key set when
    /// the cache misses or has expired.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::KeySetUnavailable`] when the endpoint cannot be
    /// reached and [`AuthError::KeyNotFound`] when the set holds no matching
    /// key.
    pub async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(kid)
                && cached.expires_at > Utc::now()
            {
                return Ok(cached.key.clone());
            }
        }

        let jwks = self.fetch().await?;
        let key = decoding_key(jwks.find(kid)?)?;

        {
            let mut cache = self.cache.write().await;
            cache.insert(
                kid.to_owned(),
                CachedKey {
                    key: key.clone(),
                    expires_at: Utc::now() + chrono::Duration::seconds(KEY_TTL_SECONDS),
                },
            );
        }

        Ok(key)
    }

    async fn fetch(&self) -> Result<Jwks, AuthError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

/// Decode and verify a provider token against a decoding key.
///
/// Enforces the signing algorithm, expiry, the expected audience, and the
/// expected issuers. Every rejection maps to the same opaque
/// [`AuthError::InvalidToken`]; the underlying reason is logged at debug
/// level only.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] on any verification failure.
pub fn decode_verified<T: DeserializeOwned>(
    token: &str,
    key: &DecodingKey,
    algorithm: Algorithm,
    audience: &str,
    issuers: &[&str],
) -> Result<T, AuthError> {
    let mut validation = Validation::new(algorithm);
    validation.set_audience(&[audience]);
    validation.set_issuer(issuers);
    validation.validate_exp = true;

    jsonwebtoken::decode::<T>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|err| {
            tracing::debug!(error = %err, "provider token verification failed");
            AuthError::InvalidToken
        })
}

/// Read the key identifier from a token header without verifying anything.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] for unparseable headers and headers
/// without a `kid`.
pub fn token_kid(token: &str) -> Result<String, AuthError> {
    let header = jsonwebtoken::decode_header(token).map_err(|err| {
        tracing::debug!(error = %err, "unparseable token header");
        AuthError::InvalidToken
    })?;

    header.kid.ok_or(AuthError::InvalidToken)
}
