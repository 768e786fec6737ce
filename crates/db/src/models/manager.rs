//! Maps to the `managers` table.

use fascicoli_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ManagerRow {
    pub id: DbId,
    pub display_name: String,
}
