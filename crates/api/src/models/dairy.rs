//! Dairy domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use godairy_core::{DairyCode, DairyId, OwnerId};

/// A farm business unit, owned by exactly one owner.
///
/// `dairy_id` is the short public-facing code; its global uniqueness is
/// enforced by the store at insert time, not assumed from entropy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dairy {
    /// Internal opaque ID, assigned at creation, immutable.
    pub id: DairyId,
    /// Public six-character code, unique across all dairies.
    pub dairy_id: DairyCode,
    /// The owner this dairy belongs to.
    pub owner_id: OwnerId,
    /// Business name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Customer references; empty at creation, populated by later
    /// customer-association operations.
    pub customers: Vec<String>,
    /// Set once at creation, immutable.
    pub created_at: DateTime<Utc>,
}

impl Dairy {
    /// Construct a new dairy record with the given public code.
    #[must_use]
    pub fn new(
        owner_id: OwnerId,
        dairy_id: DairyCode,
        name: String,
        address: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DairyId::generate(),
            dairy_id,
            owner_id,
            name,
            address,
            customers: Vec::new(),
            created_at: now,
        }
    }
}
