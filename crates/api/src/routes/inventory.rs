//! Route definitions for inventory items.

use axum::routing::get;
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// Routes mounted at `/inventory`.
///
/// ```text
/// GET    /        -> list (?limit=&offset=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inventory::list).post(inventory::create))
        .route(
            "/{id}",
            get(inventory::get_by_id)
                .put(inventory::update)
                .delete(inventory::delete),
        )
}
