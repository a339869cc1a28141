//! Dairy repository backed by `PostgreSQL`.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use godairy_core::{DairyCode, OwnerId};

use super::{DairyStore, StoreError};
use crate::models::Dairy;

/// `PostgreSQL`-backed [`DairyStore`].
#[derive(Clone)]
pub struct PgDairyStore {
    pool: PgPool,
}

impl PgDairyStore {
    /// Create a new dairy store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DairyStore for PgDairyStore {
    async fn code_exists(&self, code: &DairyCode) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM dairies WHERE dairy_id = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn insert_linked(&self, dairy: &Dairy) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let customers: Vec<String> = dairy.customers.clone();

        sqlx::query(
            "INSERT INTO dairies (id, dairy_id, owner_id, name, address, customers, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&dairy.id)
        .bind(&dairy.dairy_id)
        .bind(&dairy.owner_id)
        .bind(&dairy.name)
        .bind(&dairy.address)
        .bind(&customers)
        .bind(dairy.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Duplicate("dairy code already exists".to_owned());
            }
            StoreError::Unavailable(e)
        })?;

        let updated = sqlx::query(
            "UPDATE owners SET dairies = array_append(dairies, $1) WHERE owner_id = $2",
        )
        .bind(&dairy.dairy_id)
        .bind(&dairy.owner_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Owner vanished between the precondition check and the insert;
            // rolling back leaves no orphaned dairy behind.
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Dairy>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, dairy_id, owner_id, name, address, customers, created_at \
             FROM dairies WHERE owner_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(dairy_from_row).collect()
    }
}

/// Map a database row to the typed [`Dairy`] record.
fn dairy_from_row(row: &PgRow) -> Result<Dairy, StoreError> {
    Ok(Dairy {
        id: row.try_get("id")?,
        dairy_id: row.try_get("dairy_id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        customers: row.try_get("customers")?,
        created_at: row.try_get("created_at")?,
    })
}
