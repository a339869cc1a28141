//! Authentication and identity linking.
//!
//! Token verification ([`GoogleVerifier`], [`AppleVerifier`]) is pure: it
//! turns a provider token into an [`IdentityClaim`] or an error, and touches
//! no state beyond the cached provider keys. Linking that claim to an owner
//! record is [`IdentityService::link_login`], the only write path into the
//! owner store from a login.

mod apple;
mod error;
mod google;
pub mod jwks;
pub mod session;

pub use apple::AppleVerifier;
pub use error::AuthError;
pub use google::GoogleVerifier;

use chrono::Utc;

use godairy_core::{AuthProvider, DeviceType, Email};

use crate::db::OwnerStore;
use crate::models::Owner;

/// A verified identity extracted from a provider token.
#[derive(Debug, Clone)]
pub struct IdentityClaim {
    pub email: Email,
    pub name: String,
    pub picture: Option<String>,
    pub provider: AuthProvider,
}

/// Outcome of linking a verified identity to an owner record.
#[derive(Debug)]
pub struct LinkedLogin {
    pub owner: Owner,
    /// True when this login created the owner record.
    pub is_new: bool,
}

/// Find-or-create owner linking for verified logins.
#[derive(Clone)]
pub struct IdentityService<S> {
    store: S,
}

impl<S: OwnerStore> IdentityService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Link a verified identity claim to an owner record.
    ///
    /// Looks the owner up by email; a hit updates `last_login`, a miss
    /// registers a fresh owner with default plan settings. Two concurrent
    /// first logins for the same email can both miss the lookup; the loser
    /// of the insert race gets a duplicate-email rejection from the store
    /// and falls back to the update path, so both calls return the same
    /// single owner record.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] when the store is unreachable.
    pub async fn link_login(
        &self,
        claim: IdentityClaim,
        device_type: Option<DeviceType>,
    ) -> Result<LinkedLogin, AuthError> {
        let now = Utc::now();

        if self.store.find_by_email(&claim.email).await?.is_some() {
            let owner = self.store.touch_last_login(&claim.email, now).await?;
            return Ok(LinkedLogin {
                owner,
                is_new: false,
            });
        }

        let owner = Owner::register(
            claim.email.clone(),
            claim.name,
            claim.picture,
            claim.provider,
            device_type,
            now,
        );

        match self.store.insert(&owner).await {
            Ok(()) => {
                tracing::info!(owner_id = %owner.owner_id, "registered new owner");
                Ok(LinkedLogin {
                    owner,
                    is_new: true,
                })
            }
            // Lost a concurrent-registration race; the record now exists.
            Err(crate::db::StoreError::Duplicate(_)) => {
                let owner = self.store.touch_last_login(&claim.email, now).await?;
                Ok(LinkedLogin {
                    owner,
                    is_new: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn claim(email: &str) -> IdentityClaim {
        IdentityClaim {
            email: Email::parse(email).unwrap(),
            name: "Asha".to_owned(),
            picture: Some("https://example.com/p.jpg".to_owned()),
            provider: AuthProvider::Google,
        }
    }

    #[tokio::test]
    async fn test_first_login_registers_owner() {
        let store = MemoryStore::new();
        let service = IdentityService::new(store.clone());

        let linked = service
            .link_login(claim("asha@farm.example"), Some(DeviceType::Android))
            .await
            .unwrap();

        assert!(linked.is_new);
        assert_eq!(linked.owner.email.as_str(), "asha@farm.example");
        assert_eq!(linked.owner.device_type, Some(DeviceType::Android));
        assert_eq!(store.owner_count(), 1);
    }

    #[tokio::test]
    async fn test_repeat_login_reuses_owner() {
        let store = MemoryStore::new();
        let service = IdentityService::new(store.clone());

        let first = service
            .link_login(claim("asha@farm.example"), None)
            .await
            .unwrap();
        let second = service
            .link_login(claim("asha@farm.example"), None)
            .await
            .unwrap();

        assert!(first.is_new);
        assert!(!second.is_new);
        assert_eq!(first.owner.owner_id, second.owner.owner_id);
        assert!(second.owner.last_login >= first.owner.last_login);
        assert_eq!(store.owner_count(), 1);
    }

    #[tokio::test]
    async fn test_insert_race_falls_back_to_existing_owner() {
        let store = MemoryStore::new();
        let service = IdentityService::new(store.clone());

        // Simulate losing the race: the record appears between our lookup
        // miss and our insert.
        let rival = Owner::register(
            Email::parse("asha@farm.example").unwrap(),
            "Asha".to_owned(),
            None,
            AuthProvider::Apple,
            None,
            Utc::now(),
        );
        let rival_id = rival.owner_id.clone();
        let insert_result = {
            let fresh = Owner::register(
                Email::parse("asha@farm.example").unwrap(),
                "Asha".to_owned(),
                None,
                AuthProvider::Google,
                None,
                Utc::now(),
            );
            store.seed_owner(rival);
            store.insert(&fresh).await
        };
        assert!(matches!(
            insert_result,
            Err(crate::db::StoreError::Duplicate(_))
        ));

        let linked = service
            .link_login(claim("asha@farm.example"), None)
            .await
            .unwrap();

        assert!(!linked.is_new);
        assert_eq!(linked.owner.owner_id, rival_id);
        assert_eq!(store.owner_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_logins_create_one_owner() {
        let store = MemoryStore::new();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = IdentityService::new(store.clone());
            handles.push(tokio::spawn(async move {
                service
                    .link_login(claim("race@farm.example"), None)
                    .await
                    .unwrap()
            }));
        }

        let mut owner_ids = Vec::new();
        let mut new_count = 0;
        for handle in handles {
            let linked = handle.await.unwrap();
            if linked.is_new {
                new_count += 1;
            }
            owner_ids.push(linked.owner.owner_id);
        }

        assert_eq!(store.owner_count(), 1);
        assert_eq!(new_count, 1);
        assert!(owner_ids.windows(2).all(|w| w[0] == w[1]));
    }
}
