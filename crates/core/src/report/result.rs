//! Execution result shaping types.

use serde::Serialize;

use super::source::{ColumnDef, ColumnType};

/// Column metadata echoed back with a result (and served by the
/// columns endpoint for the report builder UI).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportColumnMeta {
    pub field: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

impl From<&'static ColumnDef> for ReportColumnMeta {
    fn from(c: &'static ColumnDef) -> Self {
        Self {
            field: c.field,
            label: c.label,
            ty: c.ty,
        }
    }
}

/// Result metadata: the columns in the result, the report's name, and the
/// total row count before windowing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub columns: Vec<ReportColumnMeta>,
    pub report_name: String,
    pub total: i64,
}

/// Pagination echo for the client.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total_pages: if total == 0 { 0 } else { (total + limit - 1) / limit },
        }
    }
}

/// One complete report execution result.
///
/// `data` rows contain exactly the requested columns in requested order
/// (`serde_json`'s `preserve_order` feature keeps map insertion order).
/// `aggregations` is present only when the configuration requested
/// aggregations or grouping: ungrouped it maps aggregation key to value;
/// grouped it maps each composite group key to such a mapping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExecutionResult {
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<serde_json::Value>,
    pub page_info: PageInfo,
}
