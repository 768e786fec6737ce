//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the [`BookingService`](fascicoli_core::booking::BookingService)
//! and map errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod catalog;
pub mod reference;
pub mod reservations;
pub mod session;
