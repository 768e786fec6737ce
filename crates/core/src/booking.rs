//! Booking orchestration over the store collaborators.
//!
//! Reads go through snapshot caches. A booking takes the reservation key's
//! lock, re-reads the ledger from the store, runs the admission check and
//! appends, all inside the same critical section. Stores that support a
//! conditional append (see [`StoreError::KeyConflict`]) extend that
//! guarantee across processes.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::admission::{
    build_record, check_availability, validate_selection, Availability, Selection, SelectionPolicy,
};
use crate::cache::{SnapshotCache, DEFAULT_CACHE_TTL};
use crate::catalog::{self, CatalogItem, CatalogQuery, CatalogSummary};
use crate::cost_center::{self, CostCenterEntry, CostCenterLookup, CostCenterTable};
use crate::error::CoreError;
use crate::keyed_lock::KeyedLocks;
use crate::requirements::RequirementTable;
use crate::reservation::{ReservationKey, ReservationRecord};
use crate::store::{
    CatalogStore, CostCenterStore, LedgerStore, ManagerStore, StoreError, StoreHealth,
};
use crate::types::BookingDate;

/// The store collaborators a [`BookingService`] talks to.
#[derive(Clone)]
pub struct Stores {
    pub catalog: Arc<dyn CatalogStore>,
    pub ledger: Arc<dyn LedgerStore>,
    /// `None` in deployments without a cost-center reference table.
    pub cost_centers: Option<Arc<dyn CostCenterStore>>,
    pub managers: Arc<dyn ManagerStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// Use one backend for every collaborator.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CatalogStore + LedgerStore + CostCenterStore + ManagerStore + StoreHealth + 'static,
    {
        Self {
            catalog: store.clone(),
            ledger: store.clone(),
            cost_centers: Some(store.clone()),
            managers: store.clone(),
            health: store,
        }
    }

    pub fn without_cost_centers(mut self) -> Self {
        self.cost_centers = None;
        self
    }
}

#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub cache_ttl: Duration,
    pub requirements: RequirementTable,
    pub policy: SelectionPolicy,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            requirements: RequirementTable::default(),
            policy: SelectionPolicy::default(),
        }
    }
}

/// Result of a catalog search. Empty `items` is the no-match outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub items: Vec<CatalogItem>,
    /// Active reservation already holding the searched key, when a reason
    /// was supplied.
    pub conflict: Option<ReservationRecord>,
}

pub struct BookingService {
    stores: Stores,
    settings: BookingSettings,
    catalog_cache: SnapshotCache<Vec<CatalogItem>>,
    ledger_cache: SnapshotCache<Vec<ReservationRecord>>,
    cost_center_cache: SnapshotCache<Vec<CostCenterEntry>>,
    manager_cache: SnapshotCache<Vec<String>>,
    locks: KeyedLocks,
}

impl BookingService {
    pub fn new(stores: Stores, settings: BookingSettings) -> Self {
        let ttl = settings.cache_ttl;
        Self {
            stores,
            settings,
            catalog_cache: SnapshotCache::new(ttl),
            ledger_cache: SnapshotCache::new(ttl),
            cost_center_cache: SnapshotCache::new(ttl),
            manager_cache: SnapshotCache::new(ttl),
            locks: KeyedLocks::new(),
        }
    }

    pub fn requirements(&self) -> &RequirementTable {
        &self.settings.requirements
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.settings.policy
    }

    pub fn has_cost_centers(&self) -> bool {
        self.stores.cost_centers.is_some()
    }

    pub async fn ping(&self) -> Result<(), CoreError> {
        Ok(self.stores.health.ping().await?)
    }

    // -- cached reads --------------------------------------------------------

    pub async fn catalog(&self) -> Result<Arc<Vec<CatalogItem>>, CoreError> {
        let store = &self.stores.catalog;
        Ok(self
            .catalog_cache
            .get_or_load(|| async { store.list_items().await })
            .await?)
    }

    pub async fn ledger(&self) -> Result<Arc<Vec<ReservationRecord>>, CoreError> {
        let store = &self.stores.ledger;
        Ok(self
            .ledger_cache
            .get_or_load(|| async { store.list_reservations().await })
            .await?)
    }

    pub async fn cost_center_entries(&self) -> Result<Arc<Vec<CostCenterEntry>>, CoreError> {
        let Some(store) = &self.stores.cost_centers else {
            return Ok(Arc::new(Vec::new()));
        };
        Ok(self
            .cost_center_cache
            .get_or_load(|| async { store.list_cost_centers().await })
            .await?)
    }

    pub async fn managers(&self) -> Result<Vec<String>, CoreError> {
        let store = &self.stores.managers;
        let managers = self
            .manager_cache
            .get_or_load(|| async { store.list_managers().await })
            .await?;
        let mut names: Vec<String> = managers.as_ref().clone();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Manual reload: drop every snapshot so the next read hits the store.
    pub async fn reload(&self) {
        self.catalog_cache.invalidate().await;
        self.ledger_cache.invalidate().await;
        self.cost_center_cache.invalidate().await;
        self.manager_cache.invalidate().await;
        tracing::info!("Store snapshots invalidated");
    }

    // -- option lists --------------------------------------------------------

    pub async fn portfolios(&self) -> Result<Vec<String>, CoreError> {
        Ok(catalog::portfolios(&self.catalog().await?))
    }

    pub async fn customer_ids(&self, portfolio: Option<&str>) -> Result<Vec<String>, CoreError> {
        Ok(catalog::customer_ids(&self.catalog().await?, portfolio))
    }

    pub async fn cost_center_names(&self) -> Result<Vec<String>, CoreError> {
        Ok(cost_center::cost_center_names(
            &self.cost_center_entries().await?,
        ))
    }

    pub async fn summary(&self) -> Result<CatalogSummary, CoreError> {
        Ok(catalog::summarize(&self.catalog().await?))
    }

    // -- search & availability -----------------------------------------------

    /// Filter the catalog and, when `reason` is given, report an active
    /// reservation on the resulting key from the cached ledger.
    pub async fn search(
        &self,
        query: &CatalogQuery,
        reason: Option<&str>,
    ) -> Result<SearchOutcome, CoreError> {
        let items = catalog::filter_items(&self.catalog().await?, query);
        let conflict = match (items.first(), reason.filter(|r| !r.trim().is_empty())) {
            (Some(first), Some(reason)) => {
                let key = ReservationKey::new(&first.customer_id, &first.portfolio, reason);
                match check_availability(&self.ledger().await?, &key) {
                    Availability::Conflict(existing) => Some(existing),
                    Availability::Available => None,
                }
            }
            _ => None,
        };
        tracing::debug!(
            customer_id = %query.customer_id,
            portfolio = ?query.portfolio_filter(),
            found = items.len(),
            conflict = conflict.is_some(),
            "Catalog search"
        );
        Ok(SearchOutcome { items, conflict })
    }

    /// Availability against the cached ledger snapshot.
    pub async fn availability(&self, key: &ReservationKey) -> Result<Availability, CoreError> {
        Ok(check_availability(&self.ledger().await?, key))
    }

    /// Ledger rows in best-effort chronological order.
    pub async fn reservations(&self, active_only: bool) -> Result<Vec<ReservationRecord>, CoreError> {
        let mut rows: Vec<ReservationRecord> = self
            .ledger()
            .await?
            .iter()
            .filter(|r| !active_only || r.is_active())
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.request_date);
        Ok(rows)
    }

    // -- booking -------------------------------------------------------------

    /// Book a folder for today's date.
    pub async fn book(&self, selection: &Selection) -> Result<ReservationRecord, CoreError> {
        self.book_on(selection, chrono::Local::now().date_naive())
            .await
    }

    /// Book a folder with an explicit request date.
    pub async fn book_on(
        &self,
        selection: &Selection,
        today: BookingDate,
    ) -> Result<ReservationRecord, CoreError> {
        let query = CatalogQuery {
            customer_id: selection.customer_id.clone(),
            portfolio: selection.portfolio_filter().map(str::to_string),
        };
        let items = catalog::filter_items(&self.catalog().await?, &query);
        validate_selection(
            selection,
            &self.settings.policy,
            &self.settings.requirements,
            &items,
        )?;

        let entries = self.cost_center_entries().await?;
        let record = {
            let table = CostCenterTable::new(&entries);
            let lookup: Option<&dyn CostCenterLookup> = if self.has_cost_centers() {
                Some(&table)
            } else {
                None
            };
            build_record(&items, selection, lookup, today)?
        };
        let key = record.key();

        let _guard = self.locks.lock(&key.canonical()).await;

        let ledger = self.stores.ledger.list_reservations().await?;
        if let Availability::Conflict(existing) = check_availability(&ledger, &key) {
            tracing::warn!(
                key = %key,
                existing_date = %existing.request_date,
                "Booking rejected: active reservation exists"
            );
            return Err(CoreError::DuplicateReservation { key });
        }

        match self.stores.ledger.append_reservation(&record).await {
            Ok(()) => {}
            Err(StoreError::KeyConflict(_)) => {
                self.ledger_cache.invalidate().await;
                tracing::warn!(key = %key, "Booking rejected by conditional append");
                return Err(CoreError::DuplicateReservation { key });
            }
            Err(e) => {
                // The append may or may not have landed; force the next read
                // to come from the store.
                self.ledger_cache.invalidate().await;
                tracing::error!(key = %key, error = %e, "Reservation append failed");
                return Err(e.into());
            }
        }
        self.ledger_cache.invalidate().await;

        tracing::info!(
            key = %key,
            manager = %record.manager,
            cost_center = %record.cost_center,
            "Folder booked"
        );
        Ok(record)
    }
}
