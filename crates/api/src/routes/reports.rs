//! Route definitions for saved reports.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /sources/{source}/columns  -> source_columns
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/execute              -> execute
/// GET    /{id}/export               -> export (?format=csv|json)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list).post(reports::create))
        .route("/sources/{source}/columns", get(reports::source_columns))
        .route(
            "/{id}",
            get(reports::get_by_id)
                .put(reports::update)
                .delete(reports::delete),
        )
        .route("/{id}/execute", post(reports::execute))
        .route("/{id}/export", get(reports::export))
}
