//! Execution orchestrator for saved reports.
//!
//! One call runs one saved report: validate the merged configuration,
//! issue one row query (plus one aggregate query when requested), shape
//! the rows, and record `last_generated_at`. Validation failures abort
//! before any SQL is issued, and a failed execution never touches the
//! saved report.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use upkeep_core::report::{
    build_window, validate, AggregateFunction, ColumnType, PageInfo, ReportColumnMeta,
    ReportConfiguration, ReportError, ReportExecutionResult, ReportMetadata, ValidatedReport,
    DEFAULT_LIMIT,
};
use upkeep_core::types::Timestamp;

use crate::models::report::{ExecuteOverrides, SavedReport};
use crate::repositories::ReportRepo;

use super::builder::{build_aggregate_query, build_count_query, build_row_query, BindValue};

/// Errors surfaced by report execution.
#[derive(Debug, thiserror::Error)]
pub enum ReportExecutionError {
    /// The configuration failed validation; no query was issued.
    #[error(transparent)]
    Invalid(#[from] ReportError),

    /// The underlying query failed. Surfaced as-is, never retried.
    #[error("Data store failure: {0}")]
    DataStore(#[from] sqlx::Error),

    /// The stored configuration document no longer deserializes.
    #[error("Stored report configuration is corrupt: {0}")]
    CorruptConfig(#[from] serde_json::Error),
}

/// Execute a saved report with runtime overrides.
///
/// Overrides may replace the date window and the pagination window only;
/// columns, filters, sorting, and aggregations come from the saved
/// configuration.
pub async fn execute(
    pool: &PgPool,
    report: &SavedReport,
    overrides: &ExecuteOverrides,
) -> Result<ReportExecutionResult, ReportExecutionError> {
    // -- Validating --
    let source = upkeep_core::report::DataSource::parse(&report.report_type)?;
    let config: ReportConfiguration = serde_json::from_value(report.config.clone())?;
    let date_range = overrides.date_range.or(config.date_range);
    let window = build_window(
        overrides.page.unwrap_or(1),
        overrides.limit.unwrap_or(DEFAULT_LIMIT),
    );
    let validated = validate(source, &config, date_range, window)?;
    tracing::debug!(report_id = report.id, source = source.as_str(), "report validated");

    // -- Querying --
    let row_query = build_row_query(&validated);
    let rows = bind_values(sqlx::query(&row_query.sql), &row_query.binds)
        .fetch_all(pool)
        .await?;

    let count_query = build_count_query(&validated);
    let total = bind_values_scalar(
        sqlx::query_scalar::<_, i64>(&count_query.sql),
        &count_query.binds,
    )
    .fetch_one(pool)
    .await?;

    let agg_rows = match build_aggregate_query(&validated) {
        Some(q) => Some(
            bind_values(sqlx::query(&q.sql), &q.binds)
                .fetch_all(pool)
                .await?,
        ),
        None => None,
    };
    tracing::debug!(report_id = report.id, rows = rows.len(), total, "report queried");

    // -- Shaping --
    let data = rows
        .iter()
        .map(|row| shape_row(&validated, row))
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    let aggregations = match agg_rows {
        Some(rows) => Some(shape_aggregations(&validated, &rows)?),
        None => None,
    };

    let result = ReportExecutionResult {
        data,
        metadata: ReportMetadata {
            columns: validated.columns.iter().map(|c| ReportColumnMeta::from(*c)).collect(),
            report_name: report.name.clone(),
            total,
        },
        aggregations,
        page_info: PageInfo::new(window.page, window.limit, total),
    };

    // -- Done: record the successful generation. --
    ReportRepo::touch_last_generated(pool, report.id).await?;

    Ok(result)
}

// ---------------------------------------------------------------------------
// Bind helpers
// ---------------------------------------------------------------------------

fn bind_values<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for b in binds {
        q = match b {
            BindValue::Int(v) => q.bind(*v),
            BindValue::Text(v) => q.bind(v),
            BindValue::Number(v) => q.bind(*v),
            BindValue::Date(v) => q.bind(*v),
            BindValue::Bool(v) => q.bind(*v),
            BindValue::TextArray(v) => q.bind(v),
            BindValue::NumberArray(v) => q.bind(v),
            BindValue::DateArray(v) => q.bind(v),
            BindValue::BoolArray(v) => q.bind(v),
        };
    }
    q
}

fn bind_values_scalar<'q, T>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, T, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, T, sqlx::postgres::PgArguments> {
    for b in binds {
        q = match b {
            BindValue::Int(v) => q.bind(*v),
            BindValue::Text(v) => q.bind(v),
            BindValue::Number(v) => q.bind(*v),
            BindValue::Date(v) => q.bind(*v),
            BindValue::Bool(v) => q.bind(*v),
            BindValue::TextArray(v) => q.bind(v),
            BindValue::NumberArray(v) => q.bind(v),
            BindValue::DateArray(v) => q.bind(v),
            BindValue::BoolArray(v) => q.bind(v),
        };
    }
    q
}

// ---------------------------------------------------------------------------
// Row shaping
// ---------------------------------------------------------------------------

/// Shape one row into a field-keyed object containing exactly the
/// requested columns, in requested order.
fn shape_row(
    validated: &ValidatedReport,
    row: &PgRow,
) -> Result<serde_json::Map<String, serde_json::Value>, sqlx::Error> {
    let mut out = serde_json::Map::with_capacity(validated.columns.len());
    for (i, column) in validated.columns.iter().enumerate() {
        out.insert(column.field.to_string(), decode_cell(row, i, column.ty)?);
    }
    Ok(out)
}

fn decode_cell(row: &PgRow, idx: usize, ty: ColumnType) -> Result<serde_json::Value, sqlx::Error> {
    let value = match ty {
        ColumnType::String => row
            .try_get::<Option<String>, _>(idx)?
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
        ColumnType::Number => row
            .try_get::<Option<f64>, _>(idx)?
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ColumnType::Boolean => row
            .try_get::<Option<bool>, _>(idx)?
            .map(serde_json::Value::Bool)
            .unwrap_or(serde_json::Value::Null),
        ColumnType::Date => row
            .try_get::<Option<Timestamp>, _>(idx)?
            .map(|ts| serde_json::Value::String(ts.to_rfc3339()))
            .unwrap_or(serde_json::Value::Null),
    };
    Ok(value)
}

// ---------------------------------------------------------------------------
// Aggregation shaping
// ---------------------------------------------------------------------------

/// Shape aggregate rows for chart rendering.
///
/// Ungrouped: a single object mapping each aggregation key to its value
/// (`count` is 0 over an empty set, the numeric functions are null).
/// Grouped: an object keyed by composite group key (group values joined
/// with `|`), each holding such a mapping. Groups with no matching rows
/// are absent.
fn shape_aggregations(
    validated: &ValidatedReport,
    rows: &[PgRow],
) -> Result<serde_json::Value, sqlx::Error> {
    let group_len = validated.group_by.len();
    let mut out = serde_json::Map::new();

    if group_len == 0 {
        // An aggregate query without GROUP BY returns exactly one row.
        if let Some(row) = rows.first() {
            for (i, agg) in validated.aggregations.iter().enumerate() {
                out.insert(agg.key.clone(), decode_aggregate(row, i, agg.function)?);
            }
        }
        return Ok(serde_json::Value::Object(out));
    }

    for row in rows {
        let mut key_parts = Vec::with_capacity(group_len);
        for (i, column) in validated.group_by.iter().enumerate() {
            key_parts.push(render_group_key(decode_cell(row, i, column.ty)?));
        }

        let mut values = serde_json::Map::with_capacity(validated.aggregations.len());
        for (j, agg) in validated.aggregations.iter().enumerate() {
            values.insert(
                agg.key.clone(),
                decode_aggregate(row, group_len + j, agg.function)?,
            );
        }
        out.insert(key_parts.join("|"), serde_json::Value::Object(values));
    }

    Ok(serde_json::Value::Object(out))
}

fn decode_aggregate(
    row: &PgRow,
    idx: usize,
    function: AggregateFunction,
) -> Result<serde_json::Value, sqlx::Error> {
    match function {
        AggregateFunction::Count => Ok(serde_json::Value::from(row.try_get::<i64, _>(idx)?)),
        _ => Ok(row
            .try_get::<Option<f64>, _>(idx)?
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)),
    }
}

fn render_group_key(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
