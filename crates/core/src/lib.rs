//! Folder reservation domain logic.
//!
//! Pure admission rules plus the collaborator traits and orchestration that
//! sit on top of them. No HTTP and no SQL here.

pub mod admission;
pub mod booking;
pub mod cache;
pub mod catalog;
pub mod cost_center;
pub mod error;
pub mod keyed_lock;
pub mod requirements;
pub mod reservation;
pub mod session;
pub mod store;
pub mod types;
