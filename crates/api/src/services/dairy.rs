//! Dairy creation and listing.
//!
//! Creation allocates a public dairy code: generate a random candidate,
//! check it against the store, and let the store's unique index have the
//! final word at insert time. A collision at insert (two requests drawing
//! the same unchecked code) retries with a fresh candidate, bounded so a
//! pathological run cannot loop forever.

use thiserror::Error;

use chrono::Utc;

use godairy_core::{DairyCode, OwnerId};

use crate::db::{DairyStore, OwnerStore, StoreError};
use crate::models::Dairy;

/// Upper bound on code-allocation attempts per creation request.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Errors that can occur creating or listing dairies.
#[derive(Debug, Error)]
pub enum DairyError {
    /// The claimed owner does not exist; nothing was written.
    #[error("owner not found")]
    OwnerNotFound,

    /// Every allocation attempt collided with an existing code.
    #[error("could not allocate a unique dairy code after {MAX_CODE_ATTEMPTS} attempts")]
    CodeSpaceExhausted,

    /// Store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Dairy creation and listing over an owner store and a dairy store.
#[derive(Clone)]
pub struct DairyService<D, O> {
    dairies: D,
    owners: O,
}

impl<D: DairyStore, O: OwnerStore> DairyService<D, O> {
    pub const fn new(dairies: D, owners: O) -> Self {
        Self { dairies, owners }
    }

    /// Create a dairy for an owner, allocating a fresh public code.
    ///
    /// The owner must exist before anything is written. Code candidates come
    /// from the thread-local RNG; see [`Self::create_with_codes`] for the
    /// allocation contract.
    ///
    /// # Errors
    ///
    /// Returns [`DairyError::OwnerNotFound`] for unknown owners,
    /// [`DairyError::CodeSpaceExhausted`] when every candidate collided,
    /// and [`DairyError::Store`] for store failures.
    pub async fn create(
        &self,
        owner_id: OwnerId,
        name: String,
        address: String,
    ) -> Result<Dairy, DairyError> {
        let codes =
            std::iter::repeat_with(|| DairyCode::generate(&mut rand::rng()))
                .take(MAX_CODE_ATTEMPTS);
        self.create_with_codes(owner_id, name, address, codes).await
    }

    /// List an owner's dairies in stable creation order.
    ///
    /// An unknown owner gets an empty list, same as an owner with no
    /// dairies.
    ///
    /// # Errors
    ///
    /// Returns [`DairyError::Store`] when the store is unreachable.
    pub async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Dairy>, DairyError> {
        Ok(self.dairies.list_by_owner(owner_id).await?)
    }

    /// Create a dairy drawing code candidates from `codes`.
    ///
    /// For each candidate: skip it if the store already holds it, otherwise
    /// attempt the atomic insert-and-link. A duplicate rejection at insert
    /// means another request claimed the code between our check and our
    /// write; move on to the next candidate. Exhausting `codes` without a
    /// successful insert is [`DairyError::CodeSpaceExhausted`].
    async fn create_with_codes(
        &self,
        owner_id: OwnerId,
        name: String,
        address: String,
        codes: impl IntoIterator<Item = DairyCode>,
    ) -> Result<Dairy, DairyError> {
        if self.owners.find_by_id(&owner_id).await?.is_none() {
            return Err(DairyError::OwnerNotFound);
        }

        for code in codes {
            if self.dairies.code_exists(&code).await? {
                continue;
            }

            let dairy = Dairy::new(owner_id.clone(), code, name.clone(), address.clone(), Utc::now());
            match self.dairies.insert_linked(&dairy).await {
                Ok(()) => {
                    tracing::info!(
                        dairy_id = %dairy.dairy_id,
                        owner_id = %dairy.owner_id,
                        "created dairy"
                    );
                    return Ok(dairy);
                }
                // Check-then-insert race on the code; try the next candidate.
                Err(StoreError::Duplicate(_)) => continue,
                // The owner vanished between our check and the link step.
                Err(StoreError::NotFound) => return Err(DairyError::OwnerNotFound),
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(owner_id = %owner_id, "dairy code allocation exhausted");
        Err(DairyError::CodeSpaceExhausted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::Owner;
    use godairy_core::{AuthProvider, Email};

    fn seeded_owner(store: &MemoryStore, email: &str) -> OwnerId {
        let owner = Owner::register(
            Email::parse(email).unwrap(),
            "Asha".to_owned(),
            None,
            AuthProvider::Google,
            None,
            Utc::now(),
        );
        let id = owner.owner_id.clone();
        store.seed_owner(owner);
        id
    }

    fn service(store: &MemoryStore) -> DairyService<MemoryStore, MemoryStore> {
        DairyService::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn test_create_assigns_well_formed_code() {
        let store = MemoryStore::new();
        let owner_id = seeded_owner(&store, "asha@farm.example");

        let dairy = service(&store)
            .create(owner_id.clone(), "Sunrise Dairy".to_owned(), "Anand".to_owned())
            .await
            .unwrap();

        assert_eq!(dairy.dairy_id.as_str().len(), 6);
        assert!(
            dairy
                .dairy_id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
        assert_eq!(dairy.owner_id, owner_id);
        assert_eq!(store.dairy_count(), 1);
    }

    #[tokio::test]
    async fn test_create_appends_code_to_owner() {
        let store = MemoryStore::new();
        let owner_id = seeded_owner(&store, "asha@farm.example");
        let service = service(&store);

        let first = service
            .create(owner_id.clone(), "One".to_owned(), "Anand".to_owned())
            .await
            .unwrap();
        let second = service
            .create(owner_id.clone(), "Two".to_owned(), "Anand".to_owned())
            .await
            .unwrap();

        let owner = store.find_by_id(&owner_id).await.unwrap().unwrap();
        assert_eq!(owner.dairies, vec![first.dairy_id, second.dairy_id]);
    }

    #[tokio::test]
    async fn test_ghost_owner_writes_nothing() {
        let store = MemoryStore::new();

        let result = service(&store)
            .create(OwnerId::generate(), "Ghost".to_owned(), "Nowhere".to_owned())
            .await;

        assert!(matches!(result, Err(DairyError::OwnerNotFound)));
        assert_eq!(store.dairy_count(), 0);
        assert_eq!(store.owner_count(), 0);
    }

    #[tokio::test]
    async fn test_collision_retries_with_next_candidate() {
        let store = MemoryStore::new();
        let owner_id = seeded_owner(&store, "asha@farm.example");
        let service = service(&store);

        let taken = DairyCode::parse("AAAAAA").unwrap();
        let fresh = DairyCode::parse("BBBBBB").unwrap();
        store
            .insert_linked(&Dairy::new(
                owner_id.clone(),
                taken.clone(),
                "First".to_owned(),
                "Anand".to_owned(),
                Utc::now(),
            ))
            .await
            .unwrap();

        let dairy = service
            .create_with_codes(
                owner_id,
                "Second".to_owned(),
                "Anand".to_owned(),
                [taken, fresh.clone()],
            )
            .await
            .unwrap();

        assert_eq!(dairy.dairy_id, fresh);
        assert_eq!(store.dairy_count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_candidates_fail_without_partial_writes() {
        let store = MemoryStore::new();
        let owner_id = seeded_owner(&store, "asha@farm.example");
        let service = service(&store);

        let taken = DairyCode::parse("AAAAAA").unwrap();
        store
            .insert_linked(&Dairy::new(
                owner_id.clone(),
                taken.clone(),
                "First".to_owned(),
                "Anand".to_owned(),
                Utc::now(),
            ))
            .await
            .unwrap();

        let result = service
            .create_with_codes(
                owner_id.clone(),
                "Second".to_owned(),
                "Anand".to_owned(),
                vec![taken.clone(); MAX_CODE_ATTEMPTS],
            )
            .await;

        assert!(matches!(result, Err(DairyError::CodeSpaceExhausted)));
        assert_eq!(store.dairy_count(), 1);
        let owner = store.find_by_id(&owner_id).await.unwrap().unwrap();
        assert_eq!(owner.dairies, vec![taken]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_codes() {
        let store = MemoryStore::new();
        let owner_id = seeded_owner(&store, "asha@farm.example");

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service(&store);
            let owner_id = owner_id.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create(owner_id, format!("Dairy {i}"), "Anand".to_owned())
                    .await
                    .unwrap()
            }));
        }

        let mut codes = Vec::new();
        for handle in handles {
            codes.push(handle.await.unwrap().dairy_id);
        }

        codes.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        codes.dedup();
        assert_eq!(codes.len(), 8);
        assert_eq!(store.dairy_count(), 8);
    }

    #[tokio::test]
    async fn test_listing_is_stable_creation_order() {
        let store = MemoryStore::new();
        let owner_id = seeded_owner(&store, "asha@farm.example");
        let other_id = seeded_owner(&store, "ravi@farm.example");
        let service = service(&store);

        let first = service
            .create(owner_id.clone(), "One".to_owned(), "Anand".to_owned())
            .await
            .unwrap();
        service
            .create(other_id, "Theirs".to_owned(), "Surat".to_owned())
            .await
            .unwrap();
        let second = service
            .create(owner_id.clone(), "Two".to_owned(), "Anand".to_owned())
            .await
            .unwrap();

        let listed = service.list_by_owner(&owner_id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        let again = service.list_by_owner(&owner_id).await.unwrap();
        let again_ids: Vec<_> = again.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, again_ids);
    }

    #[tokio::test]
    async fn test_unknown_owner_lists_empty() {
        let store = MemoryStore::new();

        let listed = service(&store)
            .list_by_owner(&OwnerId::generate())
            .await
            .unwrap();

        assert!(listed.is_empty());
    }
}
