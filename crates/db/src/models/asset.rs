//! Asset entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};
use validator::Validate;

/// An asset row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub name: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: String,
    pub location: Option<String>,
    pub purchase_cost: Option<f64>,
    pub purchase_date: Option<Timestamp>,
    pub in_service: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    /// Defaults to `operational` if omitted.
    pub status: Option<String>,
    pub location: Option<String>,
    pub purchase_cost: Option<f64>,
    pub purchase_date: Option<Timestamp>,
    pub in_service: Option<bool>,
}

/// DTO for updating an existing asset. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub purchase_cost: Option<f64>,
    pub purchase_date: Option<Timestamp>,
    pub in_service: Option<bool>,
}
