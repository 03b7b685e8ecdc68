//! Repository for the `inventory_items` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::inventory::{CreateInventoryItem, InventoryItem, UpdateInventoryItem};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, part_number, location, quantity, unit_cost, reorder_point, \
    last_restocked_at, created_at, updated_at";

/// Provides CRUD operations for inventory items.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Insert a new inventory item, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInventoryItem,
    ) -> Result<InventoryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_items
                (name, part_number, location, quantity, unit_cost,
                 reorder_point, last_restocked_at)
             VALUES ($1, $2, $3, COALESCE($4, 0), $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(&input.name)
            .bind(&input.part_number)
            .bind(&input.location)
            .bind(input.quantity)
            .bind(input.unit_cost)
            .bind(input.reorder_point)
            .bind(input.last_restocked_at)
            .fetch_one(pool)
            .await
    }

    /// Find an inventory item by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items WHERE id = $1");
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List inventory items by name.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_items ORDER BY name ASC, id ASC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count all inventory items (for pagination metadata).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM inventory_items")
            .fetch_one(pool)
            .await
    }

    /// Update an inventory item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInventoryItem,
    ) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!(
            "UPDATE inventory_items SET
                name = COALESCE($2, name),
                part_number = COALESCE($3, part_number),
                location = COALESCE($4, location),
                quantity = COALESCE($5, quantity),
                unit_cost = COALESCE($6, unit_cost),
                reorder_point = COALESCE($7, reorder_point),
                last_restocked_at = COALESCE($8, last_restocked_at),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.part_number)
            .bind(&input.location)
            .bind(input.quantity)
            .bind(input.unit_cost)
            .bind(input.reorder_point)
            .bind(input.last_restocked_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete an inventory item by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
