//! Report configuration document types.
//!
//! This is the JSON shape stored in `reports.config` and accepted over the
//! wire. Field identifiers are camelCase (matching the public column
//! identifiers in the registry). A configuration is untrusted input until
//! it passes [`super::validate::validate`].

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Operators and functions
// ---------------------------------------------------------------------------

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    In,
    Between,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Contains => "contains",
            Self::In => "in",
            Self::Between => "between",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Aggregate function over a grouped or whole result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Chart the frontend should render the aggregations with. Pass-through
/// metadata; the engine never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

/// One declarative filter clause. Multiple clauses combine with AND.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFilter {
    pub field: String,
    pub operator: FilterOperator,
    /// Scalar for comparison operators, list for `in`, two-element list
    /// for `between`. Coerced against the column type during validation.
    pub value: serde_json::Value,
}

/// One sort entry. Entries apply in listed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSorting {
    pub field: String,
    pub order: SortOrder,
}

/// One requested aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportAggregation {
    /// Ignored (and may be absent) when `function` is `count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub function: AggregateFunction,
}

/// An absolute date window, applied to the source's `createdAt` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

// ---------------------------------------------------------------------------
// Configuration document
// ---------------------------------------------------------------------------

/// A complete report configuration as saved by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfiguration {
    /// Ordered list of field identifiers to return. Must be non-empty.
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<ReportFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<ReportSorting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<ReportAggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}
