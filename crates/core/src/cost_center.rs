//! Cost-center reference table and lookup.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One row of the cost-center reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenterEntry {
    pub customer_id: String,
    pub cost_center: String,
    pub portfolio_cc: String,
    pub header_name: String,
}

/// Values a booking copies from the matching cost-center row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostCenterMapping {
    pub cost_center: String,
    pub portfolio_cc: String,
    pub header_name: String,
}

impl From<&CostCenterEntry> for CostCenterMapping {
    fn from(entry: &CostCenterEntry) -> Self {
        Self {
            cost_center: entry.cost_center.clone(),
            portfolio_cc: entry.portfolio_cc.clone(),
            header_name: entry.header_name.clone(),
        }
    }
}

/// Resolves the cost-center mapping for a customer.
pub trait CostCenterLookup {
    /// `cost_center` narrows the match when the user picked one.
    fn lookup(&self, customer_id: &str, cost_center: Option<&str>) -> Option<CostCenterMapping>;
}

/// Lookup over a snapshot of reference rows. First match in row order wins.
#[derive(Debug, Clone, Copy)]
pub struct CostCenterTable<'a> {
    entries: &'a [CostCenterEntry],
}

impl<'a> CostCenterTable<'a> {
    pub fn new(entries: &'a [CostCenterEntry]) -> Self {
        Self { entries }
    }
}

impl CostCenterLookup for CostCenterTable<'_> {
    fn lookup(&self, customer_id: &str, cost_center: Option<&str>) -> Option<CostCenterMapping> {
        self.entries
            .iter()
            .filter(|e| e.customer_id == customer_id)
            .find(|e| cost_center.map_or(true, |cc| e.cost_center == cc))
            .map(CostCenterMapping::from)
    }
}

/// Sorted, de-duplicated cost-center codes for the selection filter.
pub fn cost_center_names(entries: &[CostCenterEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.cost_center.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
pub(crate) fn entry(customer_id: &str, cost_center: &str) -> CostCenterEntry {
    CostCenterEntry {
        customer_id: customer_id.to_string(),
        cost_center: cost_center.to_string(),
        portfolio_cc: format!("P{cost_center}"),
        header_name: format!("Intestazione {customer_id}"),
    }
}
