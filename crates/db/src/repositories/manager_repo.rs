//! Repository for the `managers` table.

use sqlx::PgPool;

use crate::models::manager::ManagerRow;

const COLUMNS: &str = "id, display_name";

pub struct ManagerRepo;

impl ManagerRepo {
    /// List managers alphabetically by display name.
    pub async fn list(pool: &PgPool) -> Result<Vec<ManagerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM managers ORDER BY display_name");
        sqlx::query_as::<_, ManagerRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert a manager, or return the existing row with the same name.
    pub async fn upsert(pool: &PgPool, display_name: &str) -> Result<ManagerRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO managers (display_name) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_managers_display_name \
             DO UPDATE SET display_name = EXCLUDED.display_name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ManagerRow>(&query)
            .bind(display_name)
            .fetch_one(pool)
            .await
    }
}
