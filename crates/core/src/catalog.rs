//! Folder catalog model and in-memory search.
//!
//! The catalog is read-only reference data owned by the external store.
//! Everything here filters a snapshot; nothing mutates it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One physical folder ("fascicolo") in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub portfolio: String,
    /// Customer identifier, displayed as NDG.
    pub customer_id: String,
    pub header_name: String,
    pub box_number: String,
    pub creditline_id: String,
    pub document_type: String,
}

/// Search criteria entered in the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub customer_id: String,
    /// `None` (or blank) searches every portfolio.
    #[serde(default)]
    pub portfolio: Option<String>,
}

impl CatalogQuery {
    /// The portfolio filter, with blank values treated as absent.
    pub fn portfolio_filter(&self) -> Option<&str> {
        self.portfolio
            .as_deref()
            .filter(|p| !crate::types::is_blank(p))
    }
}

/// Catalog counters shown next to the search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub portfolio_count: usize,
    pub folder_count: usize,
}

/// Return the items matching `query`, in store iteration order.
///
/// Both keys compare by exact string equality.
pub fn filter_items(items: &[CatalogItem], query: &CatalogQuery) -> Vec<CatalogItem> {
    let portfolio = query.portfolio_filter();
    items
        .iter()
        .filter(|item| item.customer_id == query.customer_id)
        .filter(|item| portfolio.map_or(true, |p| item.portfolio == p))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated portfolio names.
pub fn portfolios(items: &[CatalogItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.portfolio.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated customer ids, optionally restricted to one portfolio.
pub fn customer_ids(items: &[CatalogItem], portfolio: Option<&str>) -> Vec<String> {
    items
        .iter()
        .filter(|item| portfolio.map_or(true, |p| item.portfolio == p))
        .map(|item| item.customer_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn summarize(items: &[CatalogItem]) -> CatalogSummary {
    CatalogSummary {
        portfolio_count: portfolios(items).len(),
        folder_count: items.len(),
    }
}

#[cfg(test)]
pub(crate) fn item(portfolio: &str, customer_id: &str, box_number: &str) -> CatalogItem {
    CatalogItem {
        portfolio: portfolio.to_string(),
        customer_id: customer_id.to_string(),
        header_name: format!("Header {customer_id}"),
        box_number: box_number.to_string(),
        creditline_id: format!("CL-{customer_id}-{box_number}"),
        document_type: "contratto".to_string(),
    }
}
