//! Inventory item entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};
use validator::Validate;

/// An inventory row from the `inventory_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItem {
    pub id: DbId,
    pub name: String,
    pub part_number: Option<String>,
    pub location: Option<String>,
    pub quantity: f64,
    pub unit_cost: Option<f64>,
    pub reorder_point: Option<f64>,
    pub last_restocked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new inventory item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInventoryItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub part_number: Option<String>,
    pub location: Option<String>,
    /// Defaults to 0 if omitted.
    pub quantity: Option<f64>,
    pub unit_cost: Option<f64>,
    pub reorder_point: Option<f64>,
    pub last_restocked_at: Option<Timestamp>,
}

/// DTO for updating an existing inventory item. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInventoryItem {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub part_number: Option<String>,
    pub location: Option<String>,
    pub quantity: Option<f64>,
    pub unit_cost: Option<f64>,
    pub reorder_point: Option<f64>,
    pub last_restocked_at: Option<Timestamp>,
}
