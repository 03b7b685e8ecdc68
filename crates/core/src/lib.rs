//! Core domain logic for the upkeep backend.
//!
//! Pure logic only: no database access, no HTTP types. The report
//! configuration engine lives here: column registries per data source,
//! configuration validation, and result shaping/export.

pub mod error;
pub mod report;
pub mod types;
