//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod asset_repo;
pub mod inventory_repo;
pub mod report_repo;
pub mod work_order_repo;

pub use asset_repo::AssetRepo;
pub use inventory_repo::InventoryRepo;
pub use report_repo::ReportRepo;
pub use work_order_repo::WorkOrderRepo;

/// Clamp a requested page size to `1..=500`, defaulting to 50.
pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 500)
}

/// Clamp a requested offset to be non-negative, defaulting to 0.
pub(crate) fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
