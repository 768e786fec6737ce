//! Maps to the `cost_centers` table.

use fascicoli_core::cost_center::CostCenterEntry;
use fascicoli_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CostCenterRow {
    pub id: DbId,
    pub customer_id: String,
    pub cost_center: String,
    pub portfolio_cc: String,
    pub header_name: String,
}

impl From<CostCenterRow> for CostCenterEntry {
    fn from(row: CostCenterRow) -> Self {
        CostCenterEntry {
            customer_id: row.customer_id,
            cost_center: row.cost_center,
            portfolio_cc: row.portfolio_cc,
            header_name: row.header_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCostCenter {
    pub customer_id: String,
    pub cost_center: String,
    #[serde(default)]
    pub portfolio_cc: String,
    #[serde(default)]
    pub header_name: String,
}
