//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Conversions to and from the `fascicoli_core` domain types

pub mod catalog_item;
pub mod cost_center;
pub mod manager;
pub mod reservation;
