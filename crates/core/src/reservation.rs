//! Reservation ledger records and the reservation key.
//!
//! The ledger is append-only. A record is active while `returned` is false;
//! closing happens outside this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::BookingDate;

/// Persistence format for booking dates (`dd/mm/YYYY`).
pub const BOOKING_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_booking_date(date: BookingDate) -> String {
    date.format(BOOKING_DATE_FORMAT).to_string()
}

pub fn parse_booking_date(value: &str) -> Result<BookingDate, chrono::ParseError> {
    BookingDate::parse_from_str(value.trim(), BOOKING_DATE_FORMAT)
}

/// Serde adapters for `dd/mm/YYYY` dates.
pub mod booking_date {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_booking_date, parse_booking_date};
    use crate::types::BookingDate;

    pub fn serialize<S: Serializer>(date: &BookingDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_booking_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BookingDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_booking_date(&raw).map_err(serde::de::Error::custom)
    }

    /// Optional dates; an empty string means unset.
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<BookingDate>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => s.serialize_str(&format_booking_date(*date)),
                None => s.serialize_str(""),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<BookingDate>, D::Error> {
            let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
            if raw.trim().is_empty() {
                return Ok(None);
            }
            parse_booking_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// The triple that must be unique among active reservations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationKey {
    pub customer_id: String,
    pub portfolio: String,
    pub reason: String,
}

impl ReservationKey {
    pub fn new(
        customer_id: impl Into<String>,
        portfolio: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            portfolio: portfolio.into(),
            reason: reason.into(),
        }
    }

    /// `customer_id + "_" + portfolio + "_" + reason`, the form stored
    /// rows have always been matched on.
    pub fn canonical(&self) -> String {
        format!("{}_{}_{}", self.customer_id, self.portfolio, self.reason)
    }
}

impl fmt::Display for ReservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Open,
    Closed,
}

/// One booking event in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub portfolio: String,
    pub customer_id: String,
    pub reason: String,
    #[serde(with = "booking_date")]
    pub request_date: BookingDate,
    pub requester_first_name: String,
    pub requester_last_name: String,
    pub manager: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sub_reason: String,
    #[serde(default)]
    pub document_types: Vec<String>,
    #[serde(default)]
    pub detail: String,
    pub booked: bool,
    pub returned: bool,
    #[serde(with = "booking_date::option", default)]
    pub fulfillment_date: Option<BookingDate>,
    #[serde(with = "booking_date::option", default)]
    pub return_date: Option<BookingDate>,
    #[serde(default)]
    pub cost_center: String,
    #[serde(default)]
    pub cost_center_portfolio: String,
    pub header_name: String,
}

impl ReservationRecord {
    pub fn key(&self) -> ReservationKey {
        ReservationKey::new(&self.customer_id, &self.portfolio, &self.reason)
    }

    pub fn is_active(&self) -> bool {
        !self.returned
    }

    pub fn state(&self) -> RecordState {
        if self.returned {
            RecordState::Closed
        } else {
            RecordState::Open
        }
    }

    /// Closed records never count as booked.
    pub fn normalized(mut self) -> Self {
        if self.returned {
            self.booked = false;
        }
        self
    }
}

#[cfg(test)]
pub(crate) fn record(customer_id: &str, portfolio: &str, reason: &str, returned: bool) -> ReservationRecord {
    ReservationRecord {
        portfolio: portfolio.to_string(),
        customer_id: customer_id.to_string(),
        reason: reason.to_string(),
        request_date: BookingDate::from_ymd_opt(2024, 12, 23).unwrap(),
        requester_first_name: "Mario".to_string(),
        requester_last_name: "Rossi".to_string(),
        manager: "Bianchi".to_string(),
        notes: String::new(),
        sub_reason: String::new(),
        document_types: Vec::new(),
        detail: String::new(),
        booked: !returned,
        returned,
        fulfillment_date: None,
        return_date: None,
        cost_center: "CC01".to_string(),
        cost_center_portfolio: "PCC01".to_string(),
        header_name: "ACME SRL".to_string(),
    }
}
