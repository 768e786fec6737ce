//! Repository for the `catalog_items` table.

use sqlx::PgPool;

use crate::models::catalog_item::{CatalogItemRow, CreateCatalogItem};

const COLUMNS: &str = "\
    id, portfolio, customer_id, header_name, box_number, creditline_id, document_type";

/// Read access to the folder catalog, plus inserts for imports and fixtures.
pub struct CatalogRepo;

impl CatalogRepo {
    /// List every catalog row in load order.
    pub async fn list(pool: &PgPool) -> Result<Vec<CatalogItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_items ORDER BY id");
        sqlx::query_as::<_, CatalogItemRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the rows of one customer, optionally restricted to a portfolio.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: &str,
        portfolio: Option<&str>,
    ) -> Result<Vec<CatalogItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM catalog_items \
             WHERE customer_id = $1 AND ($2::TEXT IS NULL OR portfolio = $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, CatalogItemRow>(&query)
            .bind(customer_id)
            .bind(portfolio)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateCatalogItem,
    ) -> Result<CatalogItemRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO catalog_items \
                (portfolio, customer_id, header_name, box_number, creditline_id, document_type) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CatalogItemRow>(&query)
            .bind(&input.portfolio)
            .bind(&input.customer_id)
            .bind(&input.header_name)
            .bind(&input.box_number)
            .bind(&input.creditline_id)
            .bind(&input.document_type)
            .fetch_one(pool)
            .await
    }
}
