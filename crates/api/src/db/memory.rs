//! In-memory store used by unit tests.
//!
//! Mirrors the constraint behavior of the `PostgreSQL` implementation: a
//! unique index on owner email, a unique index on dairy codes, and an atomic
//! insert-and-link. Every mutation happens under one mutex acquisition, so
//! interleavings observable here are also possible against the real store.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use godairy_core::{DairyCode, Email, OwnerId};

use super::{DairyStore, OwnerStore, StoreError};
use crate::models::{Dairy, Owner};

#[derive(Default)]
struct Inner {
    owners: Vec<Owner>,
    dairies: Vec<Dairy>,
}

/// Cloneable in-memory store handle.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an owner record directly, bypassing the login path.
    pub fn seed_owner(&self, owner: Owner) {
        self.lock().owners.push(owner);
    }

    /// Number of owner records currently stored.
    pub fn owner_count(&self) -> usize {
        self.lock().owners.len()
    }

    /// Number of dairy records currently stored.
    pub fn dairy_count(&self) -> usize {
        self.lock().dairies.len()
    }

    // A poisoned mutex means a test already panicked.
    #[allow(clippy::unwrap_used)]
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

impl OwnerStore for MemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Owner>, StoreError> {
        Ok(self
            .lock()
            .owners
            .iter()
            .find(|o| o.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, owner_id: &OwnerId) -> Result<Option<Owner>, StoreError> {
        Ok(self
            .lock()
            .owners
            .iter()
            .find(|o| o.owner_id == *owner_id)
            .cloned())
    }

    async fn insert(&self, owner: &Owner) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.owners.iter().any(|o| o.email == owner.email) {
            return Err(StoreError::Duplicate("email already exists".to_owned()));
        }
        inner.owners.push(owner.clone());
        Ok(())
    }

    async fn touch_last_login(
        &self,
        email: &Email,
        at: DateTime<Utc>,
    ) -> Result<Owner, StoreError> {
        let mut inner = self.lock();
        let owner = inner
            .owners
            .iter_mut()
            .find(|o| o.email == *email)
            .ok_or(StoreError::NotFound)?;
        owner.last_login = at;
        Ok(owner.clone())
    }
}

impl DairyStore for MemoryStore {
    async fn code_exists(&self, code: &DairyCode) -> Result<bool, StoreError> {
        Ok(self.lock().dairies.iter().any(|d| d.dairy_id == *code))
    }

    async fn insert_linked(&self, dairy: &Dairy) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.dairies.iter().any(|d| d.dairy_id == dairy.dairy_id) {
            return Err(StoreError::Duplicate("dairy code already exists".to_owned()));
        }
        let Some(owner) = inner
            .owners
            .iter_mut()
            .find(|o| o.owner_id == dairy.owner_id)
        else {
            return Err(StoreError::NotFound);
        };
        owner.dairies.push(dairy.dairy_id.clone());
        inner.dairies.push(dairy.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Dairy>, StoreError> {
        let mut dairies: Vec<Dairy> = self
            .lock()
            .dairies
            .iter()
            .filter(|d| d.owner_id == *owner_id)
            .cloned()
            .collect();
        dairies.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(dairies)
    }
}
