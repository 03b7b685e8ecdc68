//! Data sources and their column registries.
//!
//! Each report runs against exactly one data source. The set of sources is
//! closed (an enum, not runtime reflection) and each variant carries a
//! static column list, so an invalid field reference is always a typed
//! validation error rather than a silent no-op or a SQL error.

use serde::{Deserialize, Serialize};

use super::error::ReportError;

// ---------------------------------------------------------------------------
// Column types
// ---------------------------------------------------------------------------

/// Semantic type of a selectable column. Drives operator compatibility
/// checks and row decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
}

/// A selectable column of a data source.
///
/// `field` is the public identifier used in report configurations;
/// `column` is the backing SQL column. Keeping the two separate means only
/// registered column names ever reach a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: &'static str,
    pub column: &'static str,
    pub label: &'static str,
    pub ty: ColumnType,
}

const fn col(
    field: &'static str,
    column: &'static str,
    label: &'static str,
    ty: ColumnType,
) -> ColumnDef {
    ColumnDef {
        field,
        column,
        label,
        ty,
    }
}

// ---------------------------------------------------------------------------
// Column registries
// ---------------------------------------------------------------------------

const WORK_ORDER_COLUMNS: &[ColumnDef] = &[
    col("woNumber", "wo_number", "WO Number", ColumnType::String),
    col("title", "title", "Title", ColumnType::String),
    col("description", "description", "Description", ColumnType::String),
    col("status", "status", "Status", ColumnType::String),
    col("priority", "priority", "Priority", ColumnType::String),
    col("isEmergency", "is_emergency", "Emergency", ColumnType::Boolean),
    col("totalCost", "total_cost", "Total Cost", ColumnType::Number),
    col("actualCost", "actual_cost", "Actual Cost", ColumnType::Number),
    col("laborHours", "labor_hours", "Labor Hours", ColumnType::Number),
    col("dueDate", "due_date", "Due Date", ColumnType::Date),
    col("completedAt", "completed_at", "Completed At", ColumnType::Date),
    col("createdAt", "created_at", "Created At", ColumnType::Date),
];

const ASSET_COLUMNS: &[ColumnDef] = &[
    col("name", "name", "Name", ColumnType::String),
    col("model", "model", "Model", ColumnType::String),
    col("serialNumber", "serial_number", "Serial Number", ColumnType::String),
    col("status", "status", "Status", ColumnType::String),
    col("location", "location", "Location", ColumnType::String),
    col("purchaseCost", "purchase_cost", "Purchase Cost", ColumnType::Number),
    col("purchaseDate", "purchase_date", "Purchase Date", ColumnType::Date),
    col("inService", "in_service", "In Service", ColumnType::Boolean),
    col("createdAt", "created_at", "Created At", ColumnType::Date),
];

const INVENTORY_COLUMNS: &[ColumnDef] = &[
    col("name", "name", "Name", ColumnType::String),
    col("partNumber", "part_number", "Part Number", ColumnType::String),
    col("location", "location", "Location", ColumnType::String),
    col("quantity", "quantity", "Quantity", ColumnType::Number),
    col("unitCost", "unit_cost", "Unit Cost", ColumnType::Number),
    col("reorderPoint", "reorder_point", "Reorder Point", ColumnType::Number),
    col(
        "lastRestockedAt",
        "last_restocked_at",
        "Last Restocked",
        ColumnType::Date,
    ),
    col("createdAt", "created_at", "Created At", ColumnType::Date),
];

const PM_SCHEDULE_COLUMNS: &[ColumnDef] = &[
    col("title", "title", "Title", ColumnType::String),
    col("status", "status", "Status", ColumnType::String),
    col("frequencyDays", "frequency_days", "Frequency (Days)", ColumnType::Number),
    col(
        "estimatedHours",
        "estimated_hours",
        "Estimated Hours",
        ColumnType::Number,
    ),
    col("nextDueAt", "next_due_at", "Next Due", ColumnType::Date),
    col(
        "lastCompletedAt",
        "last_completed_at",
        "Last Completed",
        ColumnType::Date,
    ),
    col("createdAt", "created_at", "Created At", ColumnType::Date),
];

const USER_COLUMNS: &[ColumnDef] = &[
    col("name", "name", "Name", ColumnType::String),
    col("email", "email", "Email", ColumnType::String),
    col("role", "role", "Role", ColumnType::String),
    col("hourlyRate", "hourly_rate", "Hourly Rate", ColumnType::Number),
    col("active", "active", "Active", ColumnType::Boolean),
    col("createdAt", "created_at", "Created At", ColumnType::Date),
];

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// The fixed set of domain entities a report can be built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    WorkOrder,
    Asset,
    Inventory,
    PmSchedule,
    User,
}

impl DataSource {
    /// Parse a data-source key (e.g. `"work_order"`).
    pub fn parse(key: &str) -> Result<Self, ReportError> {
        match key {
            "work_order" => Ok(Self::WorkOrder),
            "asset" => Ok(Self::Asset),
            "inventory" => Ok(Self::Inventory),
            "pm_schedule" => Ok(Self::PmSchedule),
            "user" => Ok(Self::User),
            other => Err(ReportError::UnknownDataSource(other.to_string())),
        }
    }

    /// The data-source key as stored in `reports.report_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkOrder => "work_order",
            Self::Asset => "asset",
            Self::Inventory => "inventory",
            Self::PmSchedule => "pm_schedule",
            Self::User => "user",
        }
    }

    /// Backing SQL table.
    pub fn table(&self) -> &'static str {
        match self {
            Self::WorkOrder => "work_orders",
            Self::Asset => "assets",
            Self::Inventory => "inventory_items",
            Self::PmSchedule => "pm_schedules",
            Self::User => "users",
        }
    }

    /// All selectable columns of this source. Pure lookup, no side effects.
    pub fn columns(&self) -> &'static [ColumnDef] {
        match self {
            Self::WorkOrder => WORK_ORDER_COLUMNS,
            Self::Asset => ASSET_COLUMNS,
            Self::Inventory => INVENTORY_COLUMNS,
            Self::PmSchedule => PM_SCHEDULE_COLUMNS,
            Self::User => USER_COLUMNS,
        }
    }

    /// Look up a column by its public field identifier.
    pub fn column(&self, field: &str) -> Option<&'static ColumnDef> {
        self.columns().iter().find(|c| c.field == field)
    }

    /// SQL column a `dateRange` window applies to.
    pub fn date_window_column(&self) -> &'static str {
        "created_at"
    }
}
