//! Report configuration engine.
//!
//! A saved report is a declarative document (columns, filters, sorting,
//! grouping, aggregations) over one of the fixed data sources. This module
//! is the pure half of the engine: it knows which fields each data source
//! exposes, checks a configuration against that registry, and produces a
//! typed [`validate::ValidatedReport`]. Turning a validated report into SQL
//! and running it is the job of the `upkeep-db` crate; by construction the
//! build phase over a validated report cannot fail.

pub mod config;
pub mod error;
pub mod export;
pub mod result;
pub mod source;
pub mod validate;

pub use config::{
    AggregateFunction, ChartType, DateRange, FilterOperator, ReportAggregation,
    ReportConfiguration, ReportFilter, ReportSorting, SortOrder,
};
pub use error::ReportError;
pub use result::{PageInfo, ReportColumnMeta, ReportExecutionResult, ReportMetadata};
pub use source::{ColumnDef, ColumnType, DataSource};
pub use validate::{
    build_window, validate, Predicate, ScalarValue, ValidatedAggregation, ValidatedFilter,
    ValidatedReport, ValidatedSort, Window, DEFAULT_LIMIT, MAX_LIMIT,
};
