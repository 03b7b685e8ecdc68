//! Work order entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};
use validator::Validate;

/// A work order row from the `work_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrder {
    pub id: DbId,
    pub wo_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub is_emergency: bool,
    pub asset_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub total_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub labor_hours: Option<f64>,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new work order.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkOrder {
    #[validate(length(min = 1, max = 50))]
    pub wo_number: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `open` if omitted.
    pub status: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    pub is_emergency: Option<bool>,
    pub asset_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub total_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub labor_hours: Option<f64>,
    pub due_date: Option<Timestamp>,
}

/// DTO for updating an existing work order. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkOrder {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub is_emergency: Option<bool>,
    pub asset_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub total_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub labor_hours: Option<f64>,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}
