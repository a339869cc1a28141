//! Persistence layer for GoDairy.
//!
//! The business services treat the store as an abstract repository: the
//! [`OwnerStore`] and [`DairyStore`] traits are the seam. Production uses
//! the `PostgreSQL` implementations in [`owners`] and [`dairies`]; unit tests
//! use the in-memory implementation in `memory`.
//!
//! # Tables
//!
//! - `owners` - One record per account holder (unique index on `email`)
//! - `dairies` - One record per farm unit (unique index on `dairy_id`)
//!
//! All atomicity comes from the store: unique indexes reject duplicate
//! writes with [`StoreError::Duplicate`], which callers treat as a retry
//! signal, and the dairy insert-and-link runs in a single transaction.

pub mod dairies;
#[cfg(test)]
pub mod memory;
pub mod owners;

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use godairy_core::{DairyCode, Email, OwnerId};

use crate::models::{Dairy, Owner};

/// Errors surfaced by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The persistence layer is unreachable or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// A uniqueness constraint rejected the write. Recoverable locally:
    /// callers retry (dairy codes) or fall back to the update path (emails).
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// The referenced record does not exist.
    #[error("not found")]
    NotFound,

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Repository of owner records.
#[allow(async_fn_in_trait)]
pub trait OwnerStore: Clone + Send + Sync {
    /// Look up an owner by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Owner>, StoreError>;

    /// Look up an owner by its stable ID.
    async fn find_by_id(&self, owner_id: &OwnerId) -> Result<Option<Owner>, StoreError>;

    /// Insert a new owner record.
    ///
    /// Fails with [`StoreError::Duplicate`] if an owner with the same email
    /// already exists.
    async fn insert(&self, owner: &Owner) -> Result<(), StoreError>;

    /// Set `last_login` on the owner with the given email and return the
    /// updated record.
    ///
    /// Fails with [`StoreError::NotFound`] if no such owner exists.
    async fn touch_last_login(
        &self,
        email: &Email,
        at: DateTime<Utc>,
    ) -> Result<Owner, StoreError>;
}

/// Repository of dairy records.
#[allow(async_fn_in_trait)]
pub trait DairyStore: Clone + Send + Sync {
    /// Whether a dairy with this public code already exists.
    async fn code_exists(&self, code: &DairyCode) -> Result<bool, StoreError>;

    /// Insert a dairy and append its code to the owning owner's `dairies`
    /// list, atomically.
    ///
    /// Fails with [`StoreError::Duplicate`] if the public code is already
    /// taken, and [`StoreError::NotFound`] if the owner record is gone.
    /// Neither write is visible when either fails.
    async fn insert_linked(&self, dairy: &Dairy) -> Result<(), StoreError>;

    /// All dairies belonging to an owner, oldest first. Order is stable
    /// across calls absent mutation.
    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Dairy>, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
