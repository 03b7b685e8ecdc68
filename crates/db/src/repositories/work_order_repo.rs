//! Repository for the `work_orders` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::work_order::{CreateWorkOrder, UpdateWorkOrder, WorkOrder};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, wo_number, title, description, status, priority, is_emergency, \
    asset_id, assigned_to, total_cost, actual_cost, labor_hours, \
    due_date, completed_at, created_at, updated_at";

/// Provides CRUD operations for work orders.
pub struct WorkOrderRepo;

impl WorkOrderRepo {
    /// Insert a new work order, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWorkOrder) -> Result<WorkOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_orders
                (wo_number, title, description, status, priority, is_emergency,
                 asset_id, assigned_to, total_cost, actual_cost, labor_hours, due_date)
             VALUES ($1, $2, $3, COALESCE($4, 'open'), COALESCE($5, 'medium'),
                     COALESCE($6, FALSE), $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(&input.wo_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.is_emergency)
            .bind(input.asset_id)
            .bind(input.assigned_to)
            .bind(input.total_cost)
            .bind(input.actual_cost)
            .bind(input.labor_hours)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a work order by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_orders WHERE id = $1");
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List work orders, most recently created first, with an optional
    /// status filter.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<WorkOrder>, sqlx::Error> {
        let where_clause = if status.is_some() {
            "WHERE status = $3"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM work_orders {where_clause} \
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset));
        if let Some(status) = status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Count work orders matching the optional status filter.
    pub async fn count(pool: &PgPool, status: Option<&str>) -> Result<i64, sqlx::Error> {
        match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*)::BIGINT FROM work_orders WHERE status = $1",
                )
                .bind(status)
                .fetch_one(pool)
                .await
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM work_orders")
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// Update a work order. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkOrder,
    ) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE work_orders SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                is_emergency = COALESCE($6, is_emergency),
                asset_id = COALESCE($7, asset_id),
                assigned_to = COALESCE($8, assigned_to),
                total_cost = COALESCE($9, total_cost),
                actual_cost = COALESCE($10, actual_cost),
                labor_hours = COALESCE($11, labor_hours),
                due_date = COALESCE($12, due_date),
                completed_at = COALESCE($13, completed_at),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.is_emergency)
            .bind(input.asset_id)
            .bind(input.assigned_to)
            .bind(input.total_cost)
            .bind(input.actual_cost)
            .bind(input.labor_hours)
            .bind(input.due_date)
            .bind(input.completed_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a work order by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
