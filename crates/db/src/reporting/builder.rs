//! SQL builder for validated reports.
//!
//! Only registry-resolved column names are interpolated into query text;
//! every user-supplied value travels as a bind parameter.

use upkeep_core::report::{
    AggregateFunction, ColumnDef, ColumnType, Predicate, ScalarValue, SortOrder, ValidatedReport,
};
use upkeep_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Query + bind values
// ---------------------------------------------------------------------------

/// A parameterized query: SQL text plus its bind values in `$1..$n` order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// A single bind parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Text(String),
    Number(f64),
    Date(Timestamp),
    Bool(bool),
    TextArray(Vec<String>),
    NumberArray(Vec<f64>),
    DateArray(Vec<Timestamp>),
    BoolArray(Vec<bool>),
}

impl From<&ScalarValue> for BindValue {
    fn from(v: &ScalarValue) -> Self {
        match v {
            ScalarValue::Text(s) => BindValue::Text(s.clone()),
            ScalarValue::Number(n) => BindValue::Number(*n),
            ScalarValue::Date(d) => BindValue::Date(*d),
            ScalarValue::Bool(b) => BindValue::Bool(*b),
        }
    }
}

/// Collect an `in` list into a single typed array bind. Validation
/// guarantees all elements share the column's type.
fn array_bind(column: &ColumnDef, values: &[ScalarValue]) -> BindValue {
    match column.ty {
        ColumnType::String => BindValue::TextArray(
            values
                .iter()
                .filter_map(|v| match v {
                    ScalarValue::Text(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
        ),
        ColumnType::Number => BindValue::NumberArray(
            values
                .iter()
                .filter_map(|v| match v {
                    ScalarValue::Number(n) => Some(*n),
                    _ => None,
                })
                .collect(),
        ),
        ColumnType::Date => BindValue::DateArray(
            values
                .iter()
                .filter_map(|v| match v {
                    ScalarValue::Date(d) => Some(*d),
                    _ => None,
                })
                .collect(),
        ),
        ColumnType::Boolean => BindValue::BoolArray(
            values
                .iter()
                .filter_map(|v| match v {
                    ScalarValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect(),
        ),
    }
}

// ---------------------------------------------------------------------------
// WHERE clause
// ---------------------------------------------------------------------------

/// Build the WHERE clause (filters AND date window), pushing bind values
/// onto `binds`. Returns an empty string when there is nothing to filter.
fn build_where(report: &ValidatedReport, binds: &mut Vec<BindValue>) -> String {
    let mut clauses: Vec<String> = Vec::new();

    for filter in &report.filters {
        let column = filter.column.column;
        let clause = match &filter.predicate {
            Predicate::Eq(v) => {
                binds.push(v.into());
                format!("{column} = ${}", binds.len())
            }
            Predicate::Neq(v) => {
                binds.push(v.into());
                format!("{column} <> ${}", binds.len())
            }
            Predicate::Gt(v) => {
                binds.push(v.into());
                format!("{column} > ${}", binds.len())
            }
            Predicate::Gte(v) => {
                binds.push(v.into());
                format!("{column} >= ${}", binds.len())
            }
            Predicate::Lt(v) => {
                binds.push(v.into());
                format!("{column} < ${}", binds.len())
            }
            Predicate::Lte(v) => {
                binds.push(v.into());
                format!("{column} <= ${}", binds.len())
            }
            Predicate::Contains(pattern) => {
                binds.push(BindValue::Text(format!("%{}%", escape_like(pattern))));
                format!("{column} ILIKE ${}", binds.len())
            }
            Predicate::In(values) => {
                binds.push(array_bind(filter.column, values));
                format!("{column} = ANY(${})", binds.len())
            }
            Predicate::Between(low, high) => {
                binds.push(low.into());
                let low_idx = binds.len();
                binds.push(high.into());
                format!("{column} BETWEEN ${low_idx} AND ${}", binds.len())
            }
        };
        clauses.push(clause);
    }

    if let Some(range) = &report.date_range {
        let column = report.source.date_window_column();
        binds.push(BindValue::Date(range.start));
        clauses.push(format!("{column} >= ${}", binds.len()));
        binds.push(BindValue::Date(range.end));
        clauses.push(format!("{column} <= ${}", binds.len()));
    }

    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// Escape LIKE wildcards so a `contains` pattern matches literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// SELECT expression for one column. Number columns are cast to
/// `DOUBLE PRECISION` so decoding is uniform regardless of the backing
/// column's numeric type.
fn select_expr(column: &ColumnDef) -> String {
    match column.ty {
        ColumnType::Number => {
            format!("{}::DOUBLE PRECISION AS \"{}\"", column.column, column.field)
        }
        _ => format!("{} AS \"{}\"", column.column, column.field),
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Build the windowed row query: requested columns, filters, ordering
/// (with an `id` tiebreak for deterministic pagination), limit/offset.
pub fn build_row_query(report: &ValidatedReport) -> SqlQuery {
    let select_list: Vec<String> = report.columns.iter().map(|c| select_expr(c)).collect();

    let mut binds = Vec::new();
    let where_clause = build_where(report, &mut binds);

    let mut order_parts: Vec<String> = report
        .sorting
        .iter()
        .map(|s| {
            let dir = match s.order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            };
            format!("{} {dir}", s.column.column)
        })
        .collect();
    // Entity identity as the final key guarantees a stable order even
    // when all requested sort keys tie.
    order_parts.push("id ASC".to_string());

    binds.push(BindValue::Int(report.window.limit));
    let limit_idx = binds.len();
    binds.push(BindValue::Int(report.window.offset));

    let sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} LIMIT ${limit_idx} OFFSET ${}",
        select_list.join(", "),
        report.source.table(),
        where_clause,
        order_parts.join(", "),
        binds.len(),
    );

    SqlQuery { sql, binds }
}

/// Build the unwindowed COUNT query matching the row query's filters.
pub fn build_count_query(report: &ValidatedReport) -> SqlQuery {
    let mut binds = Vec::new();
    let where_clause = build_where(report, &mut binds);
    let sql = format!(
        "SELECT COUNT(*)::BIGINT FROM {}{}",
        report.source.table(),
        where_clause
    );
    SqlQuery { sql, binds }
}

/// Build the aggregate query, or `None` when the report requests
/// neither aggregations nor grouping. Group keys come first in the select
/// list, then one expression per aggregation, aliased by its synthetic key.
pub fn build_aggregate_query(report: &ValidatedReport) -> Option<SqlQuery> {
    if !report.has_aggregate_query() {
        return None;
    }

    let mut select_list: Vec<String> = report.group_by.iter().map(|c| select_expr(c)).collect();

    for agg in &report.aggregations {
        let expr = match (agg.function, agg.column) {
            (AggregateFunction::Count, _) => "COUNT(*)::BIGINT".to_string(),
            (function, Some(column)) => format!(
                "{}({})::DOUBLE PRECISION",
                match function {
                    AggregateFunction::Sum => "SUM",
                    AggregateFunction::Avg => "AVG",
                    AggregateFunction::Min => "MIN",
                    AggregateFunction::Max => "MAX",
                    AggregateFunction::Count => unreachable!(),
                },
                column.column
            ),
            // Validation guarantees non-count aggregations carry a column.
            (_, None) => unreachable!(),
        };
        select_list.push(format!("{expr} AS \"{}\"", agg.key));
    }

    let mut binds = Vec::new();
    let where_clause = build_where(report, &mut binds);

    let mut sql = format!(
        "SELECT {} FROM {}{}",
        select_list.join(", "),
        report.source.table(),
        where_clause
    );

    if !report.group_by.is_empty() {
        let group_cols: Vec<&str> = report.group_by.iter().map(|c| c.column).collect();
        sql.push_str(&format!(
            " GROUP BY {} ORDER BY {}",
            group_cols.join(", "),
            group_cols.join(", ")
        ));
    }

    Some(SqlQuery { sql, binds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use upkeep_core::report::{build_window, validate, DataSource, ReportConfiguration};

    fn validated(source: DataSource, v: serde_json::Value) -> ValidatedReport {
        let config: ReportConfiguration = serde_json::from_value(v).unwrap();
        validate(source, &config, None, build_window(1, 10)).unwrap()
    }

    #[test]
    fn row_query_selects_requested_columns_in_order() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({ "columns": ["woNumber", "status"] }),
        );
        let q = build_row_query(&report);
        assert_eq!(
            q.sql,
            "SELECT wo_number AS \"woNumber\", status AS \"status\" FROM work_orders \
             ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(q.binds, vec![BindValue::Int(10), BindValue::Int(0)]);
    }

    #[test]
    fn number_columns_are_cast_for_uniform_decoding() {
        let report = validated(
            DataSource::Inventory,
            serde_json::json!({ "columns": ["quantity"] }),
        );
        let q = build_row_query(&report);
        assert!(q.sql.starts_with("SELECT quantity::DOUBLE PRECISION AS \"quantity\""));
    }

    #[test]
    fn filters_combine_with_and() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({
                "columns": ["woNumber"],
                "filters": [
                    {"field": "status", "operator": "eq", "value": "completed"},
                    {"field": "totalCost", "operator": "gte", "value": 100.0}
                ]
            }),
        );
        let q = build_row_query(&report);
        assert!(q.sql.contains("WHERE status = $1 AND total_cost >= $2"));
        assert_eq!(q.binds[0], BindValue::Text("completed".to_string()));
        assert_eq!(q.binds[1], BindValue::Number(100.0));
    }

    #[test]
    fn contains_builds_escaped_ilike_pattern() {
        let report = validated(
            DataSource::Asset,
            serde_json::json!({
                "columns": ["name"],
                "filters": [{"field": "name", "operator": "contains", "value": "50%_pump"}]
            }),
        );
        let q = build_row_query(&report);
        assert!(q.sql.contains("name ILIKE $1"));
        assert_eq!(q.binds[0], BindValue::Text("%50\\%\\_pump%".to_string()));
    }

    #[test]
    fn in_filter_binds_a_typed_array() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({
                "columns": ["woNumber"],
                "filters": [{"field": "status", "operator": "in", "value": ["open", "on_hold"]}]
            }),
        );
        let q = build_row_query(&report);
        assert!(q.sql.contains("status = ANY($1)"));
        assert_eq!(
            q.binds[0],
            BindValue::TextArray(vec!["open".to_string(), "on_hold".to_string()])
        );
    }

    #[test]
    fn between_consumes_two_placeholders() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({
                "columns": ["woNumber"],
                "filters": [{"field": "laborHours", "operator": "between", "value": [1.0, 8.0]}]
            }),
        );
        let q = build_row_query(&report);
        assert!(q.sql.contains("labor_hours BETWEEN $1 AND $2"));
    }

    #[test]
    fn date_range_appends_window_on_created_at() {
        let config: ReportConfiguration = serde_json::from_value(serde_json::json!({
            "columns": ["woNumber"],
            "dateRange": {"start": "2026-01-01T00:00:00Z", "end": "2026-02-01T00:00:00Z"}
        }))
        .unwrap();
        let report = validate(
            DataSource::WorkOrder,
            &config,
            config.date_range,
            build_window(1, 10),
        )
        .unwrap();
        let q = build_row_query(&report);
        assert!(q.sql.contains("WHERE created_at >= $1 AND created_at <= $2"));
    }

    #[test]
    fn sort_entries_apply_in_listed_order_with_id_tiebreak() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({
                "columns": ["woNumber"],
                "sorting": [
                    {"field": "status", "order": "desc"},
                    {"field": "woNumber", "order": "asc"}
                ]
            }),
        );
        let q = build_row_query(&report);
        assert!(q.sql.contains("ORDER BY status DESC, wo_number ASC, id ASC"));
    }

    #[test]
    fn window_translates_to_limit_offset() {
        let config: ReportConfiguration =
            serde_json::from_value(serde_json::json!({ "columns": ["name"] })).unwrap();
        let report = validate(DataSource::Asset, &config, None, build_window(3, 20)).unwrap();
        let q = build_row_query(&report);
        let n = q.binds.len();
        assert_eq!(q.binds[n - 2], BindValue::Int(20));
        assert_eq!(q.binds[n - 1], BindValue::Int(40));
    }

    #[test]
    fn count_query_shares_the_where_clause() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({
                "columns": ["woNumber"],
                "filters": [{"field": "status", "operator": "eq", "value": "open"}]
            }),
        );
        let q = build_count_query(&report);
        assert_eq!(
            q.sql,
            "SELECT COUNT(*)::BIGINT FROM work_orders WHERE status = $1"
        );
        assert_eq!(q.binds.len(), 1);
    }

    #[test]
    fn no_aggregate_query_without_aggregations() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({ "columns": ["woNumber"] }),
        );
        assert!(build_aggregate_query(&report).is_none());
    }

    #[test]
    fn grouped_aggregate_query_shape() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({
                "columns": ["status"],
                "groupBy": ["status"],
                "aggregations": [
                    {"field": "actualCost", "function": "sum"},
                    {"function": "count"}
                ]
            }),
        );
        let q = build_aggregate_query(&report).unwrap();
        assert_eq!(
            q.sql,
            "SELECT status AS \"status\", SUM(actual_cost)::DOUBLE PRECISION AS \"sum_actualCost\", \
             COUNT(*)::BIGINT AS \"count\" FROM work_orders GROUP BY status ORDER BY status"
        );
    }

    #[test]
    fn ungrouped_aggregate_query_has_no_group_by() {
        let report = validated(
            DataSource::WorkOrder,
            serde_json::json!({
                "columns": ["woNumber"],
                "aggregations": [{"field": "totalCost", "function": "avg"}]
            }),
        );
        let q = build_aggregate_query(&report).unwrap();
        assert_eq!(
            q.sql,
            "SELECT AVG(total_cost)::DOUBLE PRECISION AS \"avg_totalCost\" FROM work_orders"
        );
    }
}
