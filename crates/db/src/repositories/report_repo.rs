//! Repository for the `reports` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::report::{CreateReport, SavedReport, UpdateReport};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, description, report_type, config, is_public, \
    created_at, updated_at, last_generated_at";

/// Provides CRUD operations for saved reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a new saved report, returning the created row.
    ///
    /// The configuration is stored as JSONB exactly as validated.
    pub async fn create(pool: &PgPool, input: &CreateReport) -> Result<SavedReport, sqlx::Error> {
        let config = serde_json::to_value(&input.config)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "INSERT INTO reports (name, description, report_type, config, is_public)
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedReport>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.report_type)
            .bind(config)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    /// Find a saved report by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SavedReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, SavedReport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List saved reports, most recently created first.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<SavedReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, SavedReport>(&query)
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count all saved reports (for pagination metadata).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM reports")
            .fetch_one(pool)
            .await
    }

    /// Update a saved report. Only non-`None` fields in `input` are applied;
    /// `report_type` is immutable after creation.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReport,
    ) -> Result<Option<SavedReport>, sqlx::Error> {
        let config = match &input.config {
            Some(c) => {
                Some(serde_json::to_value(c).map_err(|e| sqlx::Error::Encode(Box::new(e)))?)
            }
            None => None,
        };
        let query = format!(
            "UPDATE reports SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                config = COALESCE($4, config),
                is_public = COALESCE($5, is_public),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedReport>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(config)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Delete a saved report by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Partial update of `last_generated_at` only, recorded after a
    /// successful execution. The configuration is never rewritten here.
    pub async fn touch_last_generated(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE reports SET last_generated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map(|_| ())
    }
}
