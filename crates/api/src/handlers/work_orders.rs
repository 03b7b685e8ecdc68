//! Handlers for the `/work-orders` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use upkeep_core::error::CoreError;
use upkeep_core::types::DbId;
use upkeep_db::models::work_order::{CreateWorkOrder, UpdateWorkOrder};
use upkeep_db::repositories::WorkOrderRepo;

use crate::error::{AppError, AppResult};
use crate::query::StatusFilterParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// GET /api/v1/work-orders?status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<impl IntoResponse> {
    let status = params.status.as_deref();
    let items = WorkOrderRepo::list(&state.pool, status, params.limit, params.offset).await?;
    let total = WorkOrderRepo::count(&state.pool, status).await?;
    Ok(Json(PagedResponse { data: items, total }))
}

/// POST /api/v1/work-orders
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkOrder>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let work_order = WorkOrderRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: work_order })))
}

/// GET /api/v1/work-orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let work_order = WorkOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkOrder",
            id,
        }))?;
    Ok(Json(DataResponse { data: work_order }))
}

/// PUT /api/v1/work-orders/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkOrder>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let work_order = WorkOrderRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkOrder",
            id,
        }))?;
    Ok(Json(DataResponse { data: work_order }))
}

/// DELETE /api/v1/work-orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = WorkOrderRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "WorkOrder",
            id,
        }))
    }
}
