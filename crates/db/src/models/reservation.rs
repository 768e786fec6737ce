//! Maps to the `reservations` table.
//!
//! Dates are stored as `dd/mm/YYYY` text; an empty string means unset.
//! `request_date` must parse. The optional fulfillment and return dates are
//! written by the return process too, so an unreadable one is logged and
//! treated as unset rather than failing the whole ledger read.

use fascicoli_core::reservation::{format_booking_date, parse_booking_date, ReservationRecord};
use fascicoli_core::store::StoreError;
use fascicoli_core::types::{BookingDate, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reservations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReservationRow {
    pub id: DbId,
    pub portfolio: String,
    pub customer_id: String,
    pub reason: String,
    pub request_date: String,
    pub requester_first_name: String,
    pub requester_last_name: String,
    pub manager: String,
    pub notes: String,
    pub sub_reason: String,
    pub document_types: Vec<String>,
    pub detail: String,
    pub booked: bool,
    pub returned: bool,
    pub fulfillment_date: String,
    pub return_date: String,
    pub cost_center: String,
    pub cost_center_portfolio: String,
    pub header_name: String,
}

fn parse_date(id: DbId, column: &str, value: &str) -> Result<BookingDate, StoreError> {
    parse_booking_date(value).map_err(|e| {
        StoreError::Corrupt(format!("reservation {id}: {column} '{value}': {e}"))
    })
}

fn parse_optional_date(id: DbId, column: &str, value: &str) -> Option<BookingDate> {
    if value.trim().is_empty() {
        return None;
    }
    match parse_booking_date(value) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(
                reservation_id = id,
                column,
                value,
                error = %e,
                "Ignoring unreadable reservation date"
            );
            None
        }
    }
}

impl TryFrom<ReservationRow> for ReservationRecord {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let request_date = parse_date(row.id, "request_date", &row.request_date)?;
        let fulfillment_date = parse_optional_date(row.id, "fulfillment_date", &row.fulfillment_date);
        let return_date = parse_optional_date(row.id, "return_date", &row.return_date);

        Ok(ReservationRecord {
            portfolio: row.portfolio,
            customer_id: row.customer_id,
            reason: row.reason,
            request_date,
            requester_first_name: row.requester_first_name,
            requester_last_name: row.requester_last_name,
            manager: row.manager,
            notes: row.notes,
            sub_reason: row.sub_reason,
            document_types: row.document_types,
            detail: row.detail,
            booked: row.booked,
            returned: row.returned,
            fulfillment_date,
            return_date,
            cost_center: row.cost_center,
            cost_center_portfolio: row.cost_center_portfolio,
            header_name: row.header_name,
        }
        .normalized())
    }
}

/// Column values for an insert, in `dd/mm/YYYY` text form.
#[derive(Debug, Clone)]
pub struct CreateReservation<'a> {
    pub record: &'a ReservationRecord,
    pub request_date: String,
    pub fulfillment_date: String,
    pub return_date: String,
}

impl<'a> From<&'a ReservationRecord> for CreateReservation<'a> {
    fn from(record: &'a ReservationRecord) -> Self {
        let text = |date: Option<BookingDate>| date.map(format_booking_date).unwrap_or_default();
        Self {
            record,
            request_date: format_booking_date(record.request_date),
            fulfillment_date: text(record.fulfillment_date),
            return_date: text(record.return_date),
        }
    }
}
