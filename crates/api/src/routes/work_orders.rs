//! Route definitions for work orders.

use axum::routing::get;
use axum::Router;

use crate::handlers::work_orders;
use crate::state::AppState;

/// Routes mounted at `/work-orders`.
///
/// ```text
/// GET    /        -> list (?status=&limit=&offset=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(work_orders::list).post(work_orders::create))
        .route(
            "/{id}",
            get(work_orders::get_by_id)
                .put(work_orders::update)
                .delete(work_orders::delete),
        )
}
