//! PostgreSQL implementation of the `fascicoli_core::store` traits.

use async_trait::async_trait;
use fascicoli_core::catalog::CatalogItem;
use fascicoli_core::cost_center::CostCenterEntry;
use fascicoli_core::reservation::{ReservationKey, ReservationRecord};
use fascicoli_core::store::{
    CatalogStore, CostCenterStore, LedgerStore, ManagerStore, StoreError, StoreHealth,
};

use crate::models::reservation::CreateReservation;
use crate::repositories::reservation_repo::ACTIVE_KEY_CONSTRAINT;
use crate::repositories::{CatalogRepo, CostCenterRepo, ManagerRepo, ReservationRepo};
use crate::DbPool;

/// All four stores backed by one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error to a store error.
///
/// A unique violation (23505) on the active-key index means another
/// writer holds the key. Everything else is treated as the store being
/// unreachable.
fn classify_sqlx_error(err: sqlx::Error, key: Option<&ReservationKey>) -> StoreError {
    if let (sqlx::Error::Database(db_err), Some(key)) = (&err, key) {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(ACTIVE_KEY_CONSTRAINT)
        {
            return StoreError::KeyConflict(key.clone());
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError> {
        let rows = CatalogRepo::list(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error(e, None))?;
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn list_reservations(&self) -> Result<Vec<ReservationRecord>, StoreError> {
        let rows = ReservationRepo::list(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error(e, None))?;
        rows.into_iter().map(ReservationRecord::try_from).collect()
    }

    async fn append_reservation(&self, record: &ReservationRecord) -> Result<(), StoreError> {
        let key = record.key();
        let row = ReservationRepo::append(&self.pool, &CreateReservation::from(record))
            .await
            .map_err(|e| classify_sqlx_error(e, Some(&key)))?;
        tracing::debug!(reservation_id = row.id, key = %key, "Reservation row inserted");
        Ok(())
    }
}

#[async_trait]
impl CostCenterStore for PgStore {
    async fn list_cost_centers(&self) -> Result<Vec<CostCenterEntry>, StoreError> {
        let rows = CostCenterRepo::list(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error(e, None))?;
        Ok(rows.into_iter().map(CostCenterEntry::from).collect())
    }
}

#[async_trait]
impl ManagerStore for PgStore {
    async fn list_managers(&self) -> Result<Vec<String>, StoreError> {
        let rows = ManagerRepo::list(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error(e, None))?;
        Ok(rows.into_iter().map(|row| row.display_name).collect())
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
