//! Collaborator traits for the external stores, plus an in-memory
//! implementation used for local runs and tests.

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;

use crate::catalog::CatalogItem;
use crate::cost_center::CostCenterEntry;
use crate::error::CoreError;
use crate::reservation::{ReservationKey, ReservationRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Network, auth or quota failure in the backing store.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Conditional append rejected: an active record already holds the key.
    #[error("active reservation already exists for {0}")]
    KeyConflict(ReservationKey),

    /// A stored row could not be decoded.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => CoreError::StoreUnavailable(msg),
            StoreError::KeyConflict(key) => CoreError::DuplicateReservation { key },
            StoreError::Corrupt(msg) => CoreError::Internal(format!("corrupt row: {msg}")),
        }
    }
}

/// Read-only folder catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError>;
}

/// Append-only reservation ledger. Rows come back in insertion order.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn list_reservations(&self) -> Result<Vec<ReservationRecord>, StoreError>;

    /// Add a row. Never overwrites an existing one.
    async fn append_reservation(&self, record: &ReservationRecord) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CostCenterStore: Send + Sync {
    async fn list_cost_centers(&self) -> Result<Vec<CostCenterEntry>, StoreError>;
}

/// Display names of the staff managers a request can be assigned to.
#[async_trait]
pub trait ManagerStore: Send + Sync {
    async fn list_managers(&self) -> Result<Vec<String>, StoreError>;
}

/// Connectivity probe used by the health endpoint.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Initial contents for an [`InMemoryStore`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSeed {
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    #[serde(default)]
    pub reservations: Vec<ReservationRecord>,
    #[serde(default)]
    pub cost_centers: Vec<CostCenterEntry>,
    #[serde(default)]
    pub managers: Vec<String>,
}

impl StoreSeed {
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!("Cannot read store seed {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| CoreError::Validation(format!("Invalid store seed: {e}")))
    }
}

/// Process-local store. Append is conditional: a second active record
/// for the same key is rejected with [`StoreError::KeyConflict`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    catalog: RwLock<Vec<CatalogItem>>,
    reservations: RwLock<Vec<ReservationRecord>>,
    cost_centers: RwLock<Vec<CostCenterEntry>>,
    managers: RwLock<Vec<String>>,
}

impl InMemoryStore {
    pub fn new(seed: StoreSeed) -> Self {
        Self {
            catalog: RwLock::new(seed.catalog),
            reservations: RwLock::new(seed.reservations),
            cost_centers: RwLock::new(seed.cost_centers),
            managers: RwLock::new(seed.managers),
        }
    }

    /// Replace the catalog, as an external refresh would.
    pub fn replace_catalog(&self, items: Vec<CatalogItem>) {
        *self.catalog.write().unwrap_or_else(|p| p.into_inner()) = items;
    }

    /// Close the first active record for `customer_id`/`portfolio`/`reason`.
    /// Stands in for the external release process.
    pub fn close_reservation(&self, key: &crate::reservation::ReservationKey) -> bool {
        let mut rows = self.reservations.write().unwrap_or_else(|p| p.into_inner());
        match rows.iter_mut().find(|r| r.is_active() && r.key() == *key) {
            Some(row) => {
                row.returned = true;
                row.booked = false;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError> {
        Ok(self.catalog.read().unwrap_or_else(|p| p.into_inner()).clone())
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn list_reservations(&self) -> Result<Vec<ReservationRecord>, StoreError> {
        let rows = self.reservations.read().unwrap_or_else(|p| p.into_inner());
        Ok(rows.iter().cloned().map(ReservationRecord::normalized).collect())
    }

    async fn append_reservation(&self, record: &ReservationRecord) -> Result<(), StoreError> {
        let mut rows = self.reservations.write().unwrap_or_else(|p| p.into_inner());
        let key = record.key();
        if record.is_active() && rows.iter().any(|r| r.is_active() && r.key() == key) {
            return Err(StoreError::KeyConflict(key));
        }
        rows.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl CostCenterStore for InMemoryStore {
    async fn list_cost_centers(&self) -> Result<Vec<CostCenterEntry>, StoreError> {
        Ok(self
            .cost_centers
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone())
    }
}

#[async_trait]
impl ManagerStore for InMemoryStore {
    async fn list_managers(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.managers.read().unwrap_or_else(|p| p.into_inner()).clone())
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
