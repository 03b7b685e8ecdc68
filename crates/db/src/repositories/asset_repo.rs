//! Repository for the `assets` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::asset::{Asset, CreateAsset, UpdateAsset};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, model, serial_number, status, location, \
    purchase_cost, purchase_date, in_service, created_at, updated_at";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets
                (name, model, serial_number, status, location,
                 purchase_cost, purchase_date, in_service)
             VALUES ($1, $2, $3, COALESCE($4, 'operational'), $5, $6, $7,
                     COALESCE($8, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(&input.status)
            .bind(&input.location)
            .bind(input.purchase_cost)
            .bind(input.purchase_date)
            .bind(input.in_service)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assets, most recently created first.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count all assets (for pagination metadata).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM assets")
            .fetch_one(pool)
            .await
    }

    /// Update an asset. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = COALESCE($2, name),
                model = COALESCE($3, model),
                serial_number = COALESCE($4, serial_number),
                status = COALESCE($5, status),
                location = COALESCE($6, location),
                purchase_cost = COALESCE($7, purchase_cost),
                purchase_date = COALESCE($8, purchase_date),
                in_service = COALESCE($9, in_service),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(&input.status)
            .bind(&input.location)
            .bind(input.purchase_cost)
            .bind(input.purchase_date)
            .bind(input.in_service)
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
