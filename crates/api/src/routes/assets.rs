//! Route definitions for assets.

use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
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
        .route("/", get(assets::list).post(assets::create))
        .route(
            "/{id}",
            get(assets::get_by_id)
                .put(assets::update)
                .delete(assets::delete),
        )
}
