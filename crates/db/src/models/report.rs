//! Saved report entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::report::{DateRange, ReportConfiguration};
use upkeep_core::types::{DbId, Timestamp};
use validator::Validate;

/// A saved report row from the `reports` table.
///
/// `config` is the stored [`ReportConfiguration`] document; it is kept as
/// raw JSON here and parsed when the report is executed.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub report_type: String,
    pub config: serde_json::Value,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub last_generated_at: Option<Timestamp>,
}

/// DTO for creating a new saved report.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReport {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    /// Data source key, e.g. `"work_order"`.
    pub report_type: String,
    pub config: ReportConfiguration,
    pub is_public: Option<bool>,
}

/// DTO for updating an existing saved report. All fields are optional;
/// the data source of a report cannot change after creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub config: Option<ReportConfiguration>,
    pub is_public: Option<bool>,
}

/// Runtime overrides accepted by the execute endpoint. Only the date
/// window and pagination may vary per execution; columns, filters,
/// sorting, and aggregations are fixed at save time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOverrides {
    pub date_range: Option<DateRange>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
