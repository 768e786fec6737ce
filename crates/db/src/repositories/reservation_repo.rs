//! Repository for the `reservations` ledger.
//!
//! Rows are only ever appended. The partial unique index
//! `uq_reservations_active_key` rejects a second active row for the same
//! customer, portfolio and reason.

use fascicoli_core::reservation::format_booking_date;
use fascicoli_core::types::BookingDate;
use sqlx::PgPool;

use crate::models::reservation::{CreateReservation, ReservationRow};

const COLUMNS: &str = "\
    id, portfolio, customer_id, reason, request_date, \
    requester_first_name, requester_last_name, manager, notes, sub_reason, \
    document_types, detail, booked, returned, fulfillment_date, return_date, \
    cost_center, cost_center_portfolio, header_name";

/// Name of the index that enforces one active reservation per key.
pub const ACTIVE_KEY_CONSTRAINT: &str = "uq_reservations_active_key";

pub struct ReservationRepo;

impl ReservationRepo {
    /// List the whole ledger in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ReservationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations ORDER BY id");
        sqlx::query_as::<_, ReservationRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find the active reservation for a key, if any.
    pub async fn find_active(
        pool: &PgPool,
        customer_id: &str,
        portfolio: &str,
        reason: &str,
    ) -> Result<Option<ReservationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE customer_id = $1 AND portfolio = $2 AND reason = $3 AND NOT returned \
             ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(customer_id)
            .bind(portfolio)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Append a row. Fails with a unique violation on
    /// [`ACTIVE_KEY_CONSTRAINT`] when the key is already held.
    pub async fn append(
        pool: &PgPool,
        input: &CreateReservation<'_>,
    ) -> Result<ReservationRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservations \
                (portfolio, customer_id, reason, request_date, \
                 requester_first_name, requester_last_name, manager, notes, sub_reason, \
                 document_types, detail, booked, returned, fulfillment_date, return_date, \
                 cost_center, cost_center_portfolio, header_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {COLUMNS}"
        );
        let record = input.record;
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(&record.portfolio)
            .bind(&record.customer_id)
            .bind(&record.reason)
            .bind(&input.request_date)
            .bind(&record.requester_first_name)
            .bind(&record.requester_last_name)
            .bind(&record.manager)
            .bind(&record.notes)
            .bind(&record.sub_reason)
            .bind(&record.document_types)
            .bind(&record.detail)
            .bind(record.booked)
            .bind(record.returned)
            .bind(&input.fulfillment_date)
            .bind(&input.return_date)
            .bind(&record.cost_center)
            .bind(&record.cost_center_portfolio)
            .bind(&record.header_name)
            .fetch_one(pool)
            .await
    }

    /// Mark the active reservation for a key as returned on `return_date`.
    /// Returns `false` when no active row matched.
    pub async fn mark_returned(
        pool: &PgPool,
        customer_id: &str,
        portfolio: &str,
        reason: &str,
        return_date: BookingDate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations SET returned = TRUE, booked = FALSE, return_date = $4 \
             WHERE customer_id = $1 AND portfolio = $2 AND reason = $3 AND NOT returned",
        )
        .bind(customer_id)
        .bind(portfolio)
        .bind(reason)
        .bind(format_booking_date(return_date))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
