/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Calendar date with no time component (booking dates).
pub type BookingDate = chrono::NaiveDate;

/// Returns `true` when `value` is empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Same as [`is_blank`] for optional inputs; `None` counts as blank.
pub fn is_blank_opt(value: Option<&str>) -> bool {
    value.map_or(true, is_blank)
}
