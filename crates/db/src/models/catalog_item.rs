//! Maps to the `catalog_items` table.

use fascicoli_core::catalog::CatalogItem;
use fascicoli_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `catalog_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogItemRow {
    pub id: DbId,
    pub portfolio: String,
    pub customer_id: String,
    pub header_name: String,
    pub box_number: String,
    pub creditline_id: String,
    pub document_type: String,
}

impl From<CatalogItemRow> for CatalogItem {
    fn from(row: CatalogItemRow) -> Self {
        CatalogItem {
            portfolio: row.portfolio,
            customer_id: row.customer_id,
            header_name: row.header_name,
            box_number: row.box_number,
            creditline_id: row.creditline_id,
            document_type: row.document_type,
        }
    }
}

/// DTO for loading a catalog row (imports and fixtures).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCatalogItem {
    pub portfolio: String,
    pub customer_id: String,
    #[serde(default)]
    pub header_name: String,
    #[serde(default)]
    pub box_number: String,
    #[serde(default)]
    pub creditline_id: String,
    #[serde(default)]
    pub document_type: String,
}
