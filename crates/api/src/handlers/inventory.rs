//! Handlers for the `/inventory` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use upkeep_core::error::CoreError;
use upkeep_core::types::DbId;
use upkeep_db::models::inventory::{CreateInventoryItem, UpdateInventoryItem};
use upkeep_db::repositories::InventoryRepo;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// GET /api/v1/inventory?limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let items = InventoryRepo::list(&state.pool, params.limit, params.offset).await?;
    let total = InventoryRepo::count(&state.pool).await?;
    Ok(Json(PagedResponse { data: items, total }))
}

/// POST /api/v1/inventory
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let item = InventoryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/inventory/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = InventoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryItem",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// PUT /api/v1/inventory/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInventoryItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let item = InventoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryItem",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/inventory/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = InventoryRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "InventoryItem",
            id,
        }))
    }
}
