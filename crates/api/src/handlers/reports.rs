//! Handlers for the `/reports` resource.
//!
//! Saved report configurations: CRUD, the column registry lookup,
//! execution, and export. A configuration is validated against its data
//! source's column registry both at save time and again at execution
//! time, so a stale configuration never reaches SQL building.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use upkeep_core::error::CoreError;
use upkeep_core::report::{
    build_window, validate, DataSource, ReportColumnMeta, ReportConfiguration, ReportError,
    DEFAULT_LIMIT, MAX_LIMIT,
};
use upkeep_core::types::DbId;
use upkeep_db::models::report::{CreateReport, ExecuteOverrides, UpdateReport};
use upkeep_db::reporting;
use upkeep_db::repositories::ReportRepo;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Query parameters for the export endpoint.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Export format: `csv` (default) or `json`.
    pub format: Option<String>,
}

/// Check a configuration against its data source's registry without
/// running it. Rejecting bad configurations at save time keeps the
/// stored `config` column executable.
fn check_config(report_type: &str, config: &ReportConfiguration) -> Result<(), ReportError> {
    let source = DataSource::parse(report_type)?;
    validate(source, config, config.date_range, build_window(1, DEFAULT_LIMIT))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/reports?limit=&offset=
///
/// List saved reports, most recently created first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let items = ReportRepo::list(&state.pool, params.limit, params.offset).await?;
    let total = ReportRepo::count(&state.pool).await?;
    Ok(Json(PagedResponse { data: items, total }))
}

/// POST /api/v1/reports
///
/// Save a new report configuration. The configuration must validate
/// against the data source's column registry.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateReport>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    check_config(&input.report_type, &input.config)?;

    let report = ReportRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/reports/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;
    Ok(Json(DataResponse { data: report }))
}

/// PUT /api/v1/reports/{id}
///
/// Update a saved report. The data source (`report_type`) is fixed at
/// creation; a replacement configuration is validated against it.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReport>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let existing = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;

    if let Some(config) = &input.config {
        check_config(&existing.report_type, config)?;
    }

    let report = ReportRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;
    Ok(Json(DataResponse { data: report }))
}

/// DELETE /api/v1/reports/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ReportRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))
    }
}

/// GET /api/v1/reports/sources/{source}/columns
///
/// The column registry for a data source, so configuration UIs can offer
/// exactly the fields that reports over that source may reference.
pub async fn source_columns(
    Path(source): Path<String>,
) -> AppResult<impl IntoResponse> {
    let source = DataSource::parse(&source)?;
    let columns: Vec<ReportColumnMeta> =
        source.columns().iter().map(ReportColumnMeta::from).collect();
    Ok(Json(DataResponse { data: columns }))
}

/// POST /api/v1/reports/{id}/execute
///
/// Run a saved report. An optional body supplies runtime overrides for
/// the date window and pagination.
pub async fn execute(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<ExecuteOverrides>>,
) -> AppResult<impl IntoResponse> {
    let report = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;

    let overrides = body.map(|Json(b)| b).unwrap_or_default();
    let result = reporting::execute(&state.pool, &report, &overrides).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/reports/{id}/export?format=csv|json
///
/// Export report rows. Exports always run page 1 at the maximum page
/// size; larger result sets are exported page by page via `execute`.
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let format = params.format.as_deref().unwrap_or("csv");
    if format != "csv" && format != "json" {
        return Err(AppError::BadRequest(format!(
            "Unsupported export format: {format}"
        )));
    }

    let report = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;

    let overrides = ExecuteOverrides {
        date_range: None,
        page: Some(1),
        limit: Some(MAX_LIMIT),
    };
    let result = reporting::execute(&state.pool, &report, &overrides).await?;

    if format == "json" {
        return Ok(Json(DataResponse { data: result }).into_response());
    }

    let csv = upkeep_core::report::export::to_csv(&result);
    let disposition = format!(
        "attachment; filename=\"{}.csv\"",
        export_file_stem(&report.name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// Reduce a report name to a safe download file stem.
fn export_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if stem.chars().all(|c| c == '_') {
        "report".to_string()
    } else {
        stem
    }
}
