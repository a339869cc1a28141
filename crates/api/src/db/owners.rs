//! Owner repository backed by `PostgreSQL`.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use godairy_core::{
    AuthProvider, DairyCode, DeviceType, Email, OwnerId, OwnerRole, PaymentStatus, Plan,
};

use super::{OwnerStore, StoreError};
use crate::models::Owner;

const OWNER_COLUMNS: &str = "owner_id, name, email, phone, picture, auth_provider, role, \
     is_active, is_verified, plan, payment_status, plan_start_date, plan_expiry_date, \
     trial_days_left, max_customers_allowed, dairies, customers_count, created_at, \
     last_login, device_type";

/// `PostgreSQL`-backed [`OwnerStore`].
#[derive(Clone)]
pub struct PgOwnerStore {
    pool: PgPool,
}

impl PgOwnerStore {
    /// Create a new owner store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OwnerStore for PgOwnerStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Owner>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {OWNER_COLUMNS} FROM owners WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(owner_from_row).transpose()
    }

    async fn find_by_id(&self, owner_id: &OwnerId) -> Result<Option<Owner>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {OWNER_COLUMNS} FROM owners WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(owner_from_row).transpose()
    }

    async fn insert(&self, owner: &Owner) -> Result<(), StoreError> {
        let dairies: Vec<String> = owner
            .dairies
            .iter()
            .map(|c| c.as_str().to_owned())
            .collect();

        sqlx::query(
            "INSERT INTO owners (owner_id, name, email, phone, picture, auth_provider, role, \
             is_active, is_verified, plan, payment_status, plan_start_date, plan_expiry_date, \
             trial_days_left, max_customers_allowed, dairies, customers_count, created_at, \
             last_login, device_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20)",
        )
        .bind(&owner.owner_id)
        .bind(&owner.name)
        .bind(&owner.email)
        .bind(&owner.phone)
        .bind(&owner.picture)
        .bind(owner.auth_provider.to_string())
        .bind(owner.role.to_string())
        .bind(owner.is_active)
        .bind(owner.is_verified)
        .bind(owner.plan.to_string())
        .bind(owner.payment_status.to_string())
        .bind(owner.plan_start_date)
        .bind(owner.plan_expiry_date)
        .bind(owner.trial_days_left)
        .bind(owner.max_customers_allowed)
        .bind(&dairies)
        .bind(owner.customers_count)
        .bind(owner.created_at)
        .bind(owner.last_login)
        .bind(owner.device_type.map(|d| d.to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Duplicate("email already exists".to_owned());
            }
            StoreError::Unavailable(e)
        })?;

        Ok(())
    }

    async fn touch_last_login(
        &self,
        email: &Email,
        at: DateTime<Utc>,
    ) -> Result<Owner, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE owners SET last_login = $2 WHERE email = $1 RETURNING {OWNER_COLUMNS}"
        ))
        .bind(email)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => owner_from_row(r),
            None => Err(StoreError::NotFound),
        }
    }
}

/// Map a database row to the typed [`Owner`] record.
///
/// Invalid stored values surface as [`StoreError::DataCorruption`] rather
/// than reaching business logic.
fn owner_from_row(row: &PgRow) -> Result<Owner, StoreError> {
    let auth_provider: AuthProvider = parse_column(row.try_get::<String, _>("auth_provider")?)?;
    let role: OwnerRole = parse_column(row.try_get::<String, _>("role")?)?;
    let plan: Plan = parse_column(row.try_get::<String, _>("plan")?)?;
    let payment_status: PaymentStatus = parse_column(row.try_get::<String, _>("payment_status")?)?;
    let device_type: Option<DeviceType> = row
        .try_get::<Option<String>, _>("device_type")?
        .map(parse_column)
        .transpose()?;

    let dairies = row
        .try_get::<Vec<String>, _>("dairies")?
        .iter()
        .map(|c| {
            DairyCode::parse(c)
                .map_err(|e| StoreError::DataCorruption(format!("invalid dairy code: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Owner {
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        picture: row.try_get("picture")?,
        auth_provider,
        role,
        is_active: row.try_get("is_active")?,
        is_verified: row.try_get("is_verified")?,
        plan,
        payment_status,
        plan_start_date: row.try_get("plan_start_date")?,
        plan_expiry_date: row.try_get("plan_expiry_date")?,
        trial_days_left: row.try_get("trial_days_left")?,
        max_customers_allowed: row.try_get("max_customers_allowed")?,
        dairies,
        customers_count: row.try_get("customers_count")?,
        created_at: row.try_get("created_at")?,
        last_login: row.try_get("last_login")?,
        device_type,
    })
}

/// Parse a text column into its typed enum.
fn parse_column<T: std::str::FromStr<Err = String>>(raw: String) -> Result<T, StoreError> {
    raw.parse().map_err(StoreError::DataCorruption)
}
