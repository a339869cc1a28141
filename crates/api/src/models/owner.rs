//! Owner domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use godairy_core::{
    AuthProvider, DairyCode, DeviceType, Email, OwnerId, OwnerRole, PaymentStatus, Plan,
};

/// Number of trial days granted to a fresh account.
const TRIAL_DAYS: i32 = 7;

/// An account holder.
///
/// Created on the first successful third-party login for a new email and
/// mutated on every subsequent login (`last_login`) and dairy creation
/// (`dairies` append). Never deleted.
///
/// Invariants:
/// - `email` is unique across all owners regardless of provider.
/// - `max_customers_allowed` always equals the plan tier's limit; change the
///   plan only through [`Owner::set_plan`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    /// Opaque stable ID, generated once, immutable.
    pub owner_id: OwnerId,
    /// Display name from the identity provider.
    pub name: String,
    /// Unique natural key across providers.
    pub email: Email,
    /// Contact phone, if the owner has provided one.
    pub phone: Option<String>,
    /// Profile picture URL from the identity provider.
    pub picture: Option<String>,
    /// Which provider verified this account's email.
    pub auth_provider: AuthProvider,
    /// Account role.
    pub role: OwnerRole,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the email is verified (providers only issue tokens for
    /// verified addresses).
    pub is_verified: bool,
    /// Subscription plan tier.
    pub plan: Plan,
    /// Payment status of the subscription.
    pub payment_status: PaymentStatus,
    /// When the current plan started.
    pub plan_start_date: DateTime<Utc>,
    /// When the current plan expires, if bounded.
    pub plan_expiry_date: Option<DateTime<Utc>>,
    /// Remaining trial days.
    pub trial_days_left: i32,
    /// Customer limit derived from the plan tier.
    pub max_customers_allowed: i32,
    /// Public codes of the dairies this owner has created, in creation order.
    pub dairies: Vec<DairyCode>,
    /// Number of customers across the owner's dairies.
    pub customers_count: i32,
    /// Set once at registration, immutable.
    pub created_at: DateTime<Utc>,
    /// Updated on every successful login.
    pub last_login: DateTime<Utc>,
    /// Device type reported at the most recent login.
    pub device_type: Option<DeviceType>,
}

impl Owner {
    /// Construct a fresh owner record for a first-time login.
    ///
    /// Defaults: `FREE` plan, `TRIAL` payment status, seven trial days,
    /// active and verified, no dairies.
    #[must_use]
    pub fn register(
        email: Email,
        name: String,
        picture: Option<String>,
        auth_provider: AuthProvider,
        device_type: Option<DeviceType>,
        now: DateTime<Utc>,
    ) -> Self {
        let plan = Plan::default();
        Self {
            owner_id: OwnerId::generate(),
            name,
            email,
            phone: None,
            picture,
            auth_provider,
            role: OwnerRole::default(),
            is_active: true,
            is_verified: true,
            plan,
            payment_status: PaymentStatus::default(),
            plan_start_date: now,
            plan_expiry_date: None,
            trial_days_left: TRIAL_DAYS,
            max_customers_allowed: plan.max_customers(),
            dairies: Vec::new(),
            customers_count: 0,
            created_at: now,
            last_login: now,
            device_type,
        }
    }

    /// Change the subscription plan, recomputing the customer limit.
    ///
    /// This is the only sanctioned way to mutate `plan`; assigning the field
    /// directly would leave `max_customers_allowed` stale.
    pub fn set_plan(&mut self, plan: Plan, now: DateTime<Utc>) {
        self.plan = plan;
        self.max_customers_allowed = plan.max_customers();
        self.plan_start_date = now;
    }
}
