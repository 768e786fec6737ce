//! Repository for the `cost_centers` table.

use sqlx::PgPool;

use crate::models::cost_center::{CostCenterRow, CreateCostCenter};

const COLUMNS: &str = "id, customer_id, cost_center, portfolio_cc, header_name";

pub struct CostCenterRepo;

impl CostCenterRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<CostCenterRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cost_centers ORDER BY id");
        sqlx::query_as::<_, CostCenterRow>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateCostCenter,
    ) -> Result<CostCenterRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO cost_centers (customer_id, cost_center, portfolio_cc, header_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CostCenterRow>(&query)
            .bind(&input.customer_id)
            .bind(&input.cost_center)
            .bind(&input.portfolio_cc)
            .bind(&input.header_name)
            .fetch_one(pool)
            .await
    }
}
