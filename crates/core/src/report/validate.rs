//! Configuration validation.
//!
//! Validation and query building are deliberately separate phases: this
//! module checks every clause of a [`ReportConfiguration`] against the
//! column registry and coerces values to their column types, producing a
//! [`ValidatedReport`]. The SQL build phase downstream consumes only
//! registry-resolved columns and typed values, so it cannot fail and no
//! query is ever issued for a configuration that failed validation.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::types::Timestamp;

use super::config::{
    AggregateFunction, DateRange, FilterOperator, ReportConfiguration, SortOrder,
};
use super::error::ReportError;
use super::source::{ColumnDef, ColumnType, DataSource};

/// Default page size when a request does not specify one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// Validated report types
// ---------------------------------------------------------------------------

/// A filter value coerced to its column's semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Number(f64),
    Date(Timestamp),
    Bool(bool),
}

/// A typed predicate over a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(ScalarValue),
    Neq(ScalarValue),
    Gt(ScalarValue),
    Gte(ScalarValue),
    Lt(ScalarValue),
    Lte(ScalarValue),
    /// Case-insensitive substring match. String columns only.
    Contains(String),
    In(Vec<ScalarValue>),
    Between(ScalarValue, ScalarValue),
}

/// A filter clause that passed registry and type checks.
#[derive(Debug, Clone)]
pub struct ValidatedFilter {
    pub column: &'static ColumnDef,
    pub predicate: Predicate,
}

/// A sort entry resolved against the registry.
#[derive(Debug, Clone)]
pub struct ValidatedSort {
    pub column: &'static ColumnDef,
    pub order: SortOrder,
}

/// An aggregation resolved against the registry.
///
/// `key` is the synthetic identifier the computed value is reported under
/// (`count`, or `{function}_{field}` such as `sum_totalCost`).
#[derive(Debug, Clone)]
pub struct ValidatedAggregation {
    pub function: AggregateFunction,
    /// `None` exactly when `function` is `count`.
    pub column: Option<&'static ColumnDef>,
    pub key: String,
}

/// 1-indexed pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// A fully validated report. Every column reference is
/// registry-resolved; the SQL builder consumes this without further checks.
#[derive(Debug, Clone)]
pub struct ValidatedReport {
    pub source: DataSource,
    pub columns: Vec<&'static ColumnDef>,
    pub filters: Vec<ValidatedFilter>,
    pub sorting: Vec<ValidatedSort>,
    pub group_by: Vec<&'static ColumnDef>,
    pub aggregations: Vec<ValidatedAggregation>,
    pub date_range: Option<DateRange>,
    pub window: Window,
}

impl ValidatedReport {
    pub fn has_aggregate_query(&self) -> bool {
        !self.aggregations.is_empty() || !self.group_by.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Compute the query window from 1-indexed page/limit.
///
/// Page is floored at 1, limit is clamped to `1..=MAX_LIMIT`.
/// `page=1, limit=20` yields offset 0.
pub fn build_window(page: i64, limit: i64) -> Window {
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_LIMIT);
    Window {
        page,
        limit,
        offset: (page - 1) * limit,
    }
}

// ---------------------------------------------------------------------------
// Validation entry point
// ---------------------------------------------------------------------------

/// Validate a configuration against `source`'s column registry.
///
/// `date_range` is the effective window after merging any runtime override
/// onto the saved configuration. Fails on the first invalid clause.
pub fn validate(
    source: DataSource,
    config: &ReportConfiguration,
    date_range: Option<DateRange>,
    window: Window,
) -> Result<ValidatedReport, ReportError> {
    if config.columns.is_empty() {
        return Err(ReportError::EmptyColumnSelection);
    }

    let mut columns = Vec::with_capacity(config.columns.len());
    for field in &config.columns {
        let column = source
            .column(field)
            .ok_or_else(|| ReportError::UnknownColumn {
                field: field.clone(),
            })?;
        columns.push(column);
    }

    let mut filters = Vec::with_capacity(config.filters.len());
    for filter in &config.filters {
        filters.push(validate_filter(source, filter)?);
    }

    let mut sorting = Vec::with_capacity(config.sorting.len());
    for sort in &config.sorting {
        let column =
            source
                .column(&sort.field)
                .ok_or_else(|| ReportError::InvalidSortField {
                    field: sort.field.clone(),
                })?;
        sorting.push(ValidatedSort {
            column,
            order: sort.order,
        });
    }

    let mut group_by = Vec::with_capacity(config.group_by.len());
    for field in &config.group_by {
        let column = source
            .column(field)
            .ok_or_else(|| ReportError::UnknownColumn {
                field: field.clone(),
            })?;
        group_by.push(column);
    }

    let mut aggregations = Vec::with_capacity(config.aggregations.len());
    for agg in &config.aggregations {
        aggregations.push(validate_aggregation(source, &group_by, agg)?);
    }

    Ok(ValidatedReport {
        source,
        columns,
        filters,
        sorting,
        group_by,
        aggregations,
        date_range,
        window,
    })
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

fn validate_filter(
    source: DataSource,
    filter: &super::config::ReportFilter,
) -> Result<ValidatedFilter, ReportError> {
    let column = source
        .column(&filter.field)
        .ok_or_else(|| ReportError::InvalidFilterField {
            field: filter.field.clone(),
        })?;

    let op = filter.operator;
    check_operator_compat(column, op)?;

    let predicate = match op {
        FilterOperator::Contains => {
            let pattern = filter
                .value
                .as_str()
                .ok_or_else(|| invalid_value(column, "expected a string"))?;
            Predicate::Contains(pattern.to_string())
        }
        FilterOperator::In => {
            // A scalar with `in` is an operator misuse, not a bad value.
            let items = filter
                .value
                .as_array()
                .ok_or_else(|| ReportError::InvalidFilterOperator {
                    field: column.field.to_string(),
                    operator: op.as_str(),
                    reason: "expects a list value",
                })?;
            let values = items
                .iter()
                .map(|v| coerce_scalar(column, v))
                .collect::<Result<Vec<_>, _>>()?;
            Predicate::In(values)
        }
        FilterOperator::Between => {
            let items = filter
                .value
                .as_array()
                .ok_or_else(|| invalid_value(column, "'between' expects a [low, high] pair"))?;
            if items.len() != 2 {
                return Err(invalid_value(column, "'between' expects exactly two values"));
            }
            Predicate::Between(
                coerce_scalar(column, &items[0])?,
                coerce_scalar(column, &items[1])?,
            )
        }
        FilterOperator::Eq => Predicate::Eq(coerce_scalar(column, &filter.value)?),
        FilterOperator::Neq => Predicate::Neq(coerce_scalar(column, &filter.value)?),
        FilterOperator::Gt => Predicate::Gt(coerce_scalar(column, &filter.value)?),
        FilterOperator::Gte => Predicate::Gte(coerce_scalar(column, &filter.value)?),
        FilterOperator::Lt => Predicate::Lt(coerce_scalar(column, &filter.value)?),
        FilterOperator::Lte => Predicate::Lte(coerce_scalar(column, &filter.value)?),
    };

    Ok(ValidatedFilter { column, predicate })
}

/// Operator-to-type compatibility: `contains` needs a string column,
/// ordering operators need a number or date column. `eq`/`neq`/`in` work
/// on any type.
fn check_operator_compat(column: &ColumnDef, op: FilterOperator) -> Result<(), ReportError> {
    let ok = match op {
        FilterOperator::Eq | FilterOperator::Neq | FilterOperator::In => true,
        FilterOperator::Contains => column.ty == ColumnType::String,
        FilterOperator::Gt
        | FilterOperator::Gte
        | FilterOperator::Lt
        | FilterOperator::Lte
        | FilterOperator::Between => {
            matches!(column.ty, ColumnType::Number | ColumnType::Date)
        }
    };
    if ok {
        Ok(())
    } else {
        let reason = match op {
            FilterOperator::Contains => "only valid on string fields",
            _ => "only valid on number or date fields",
        };
        Err(ReportError::InvalidFilterOperator {
            field: column.field.to_string(),
            operator: op.as_str(),
            reason,
        })
    }
}

fn invalid_value(column: &ColumnDef, reason: &str) -> ReportError {
    ReportError::InvalidFilterValue {
        field: column.field.to_string(),
        reason: reason.to_string(),
    }
}

/// Coerce a JSON value to the column's semantic type.
fn coerce_scalar(column: &ColumnDef, value: &serde_json::Value) -> Result<ScalarValue, ReportError> {
    match column.ty {
        ColumnType::String => value
            .as_str()
            .map(|s| ScalarValue::Text(s.to_string()))
            .ok_or_else(|| invalid_value(column, "expected a string")),
        ColumnType::Number => value
            .as_f64()
            .map(ScalarValue::Number)
            .ok_or_else(|| invalid_value(column, "expected a number")),
        ColumnType::Boolean => value
            .as_bool()
            .map(ScalarValue::Bool)
            .ok_or_else(|| invalid_value(column, "expected a boolean")),
        ColumnType::Date => {
            let s = value
                .as_str()
                .ok_or_else(|| invalid_value(column, "expected an ISO-8601 date string"))?;
            parse_date(s)
                .map(ScalarValue::Date)
                .ok_or_else(|| ReportError::InvalidFilterValue {
                    field: column.field.to_string(),
                    reason: format!("'{s}' is not a valid ISO-8601 date"),
                })
        }
    }
}

/// Parse an ISO-8601 timestamp, or a bare `YYYY-MM-DD` date as UTC midnight.
fn parse_date(s: &str) -> Option<Timestamp> {
    if let Ok(ts) = s.parse::<Timestamp>() {
        return Some(ts);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

fn validate_aggregation(
    source: DataSource,
    group_by: &[&'static ColumnDef],
    agg: &super::config::ReportAggregation,
) -> Result<ValidatedAggregation, ReportError> {
    // `count` ignores the field entirely.
    if agg.function == AggregateFunction::Count {
        return Ok(ValidatedAggregation {
            function: AggregateFunction::Count,
            column: None,
            key: "count".to_string(),
        });
    }

    let function = agg.function.as_str();
    let field = agg
        .field
        .as_deref()
        .ok_or_else(|| ReportError::InvalidAggregationField {
            field: "(none)".to_string(),
            function,
            reason: "a field is required for non-count aggregations",
        })?;

    let column =
        source
            .column(field)
            .ok_or_else(|| ReportError::InvalidAggregationField {
                field: field.to_string(),
                function,
                reason: "unknown field",
            })?;

    if column.ty != ColumnType::Number {
        return Err(ReportError::InvalidAggregationField {
            field: field.to_string(),
            function,
            reason: "field is not numeric",
        });
    }

    if group_by.iter().any(|g| g.field == column.field) {
        return Err(ReportError::InvalidAggregationField {
            field: field.to_string(),
            function,
            reason: "field is a group-by key",
        });
    }

    Ok(ValidatedAggregation {
        function: agg.function,
        column: Some(column),
        key: format!("{}_{}", function, column.field),
    })
}
