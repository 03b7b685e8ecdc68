//! Report execution: SQL building and orchestration.
//!
//! [`builder`] turns a [`upkeep_core::report::ValidatedReport`] into
//! parameterized SQL, a pure function that cannot fail since every
//! column reference was registry-resolved during validation. [`executor`]
//! runs the built queries and shapes the result.

pub mod builder;
pub mod executor;

pub use builder::{BindValue, SqlQuery};
pub use executor::{execute, ReportExecutionError};
