//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod catalog_repo;
pub mod cost_center_repo;
pub mod manager_repo;
pub mod reservation_repo;

pub use catalog_repo::CatalogRepo;
pub use cost_center_repo::CostCenterRepo;
pub use manager_repo::ManagerRepo;
pub use reservation_repo::ReservationRepo;
