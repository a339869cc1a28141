//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::{dairies::PgDairyStore, owners::PgOwnerStore};
use crate::services::auth::{AppleVerifier, GoogleVerifier, IdentityService};
use crate::services::dairy::DairyService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    google: GoogleVerifier,
    apple: AppleVerifier,
    identity: IdentityService<PgOwnerStore>,
    dairy: DairyService<PgDairyStore, PgOwnerStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider key-set HTTP client cannot be built.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, reqwest::Error> {
        let google = GoogleVerifier::new(config.google_client_id.clone())?;
        let apple = AppleVerifier::new(config.apple_bundle_id.clone())?;
        let owners = PgOwnerStore::new(pool.clone());
        let identity = IdentityService::new(owners.clone());
        let dairy = DairyService::new(PgDairyStore::new(pool.clone()), owners);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                google,
                apple,
                identity,
                dairy,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Google token verifier.
    #[must_use]
    pub fn google(&self) -> &GoogleVerifier {
        &self.inner.google
    }

    /// Get a reference to the Apple token verifier.
    #[must_use]
    pub fn apple(&self) -> &AppleVerifier {
        &self.inner.apple
    }

    /// Get a reference to the identity-linking service.
    #[must_use]
    pub fn identity(&self) -> &IdentityService<PgOwnerStore> {
        &self.inner.identity
    }

    /// Get a reference to the dairy service.
    #[must_use]
    pub fn dairy(&self) -> &DairyService<PgDairyStore, PgOwnerStore> {
        &self.inner.dairy
    }
}
