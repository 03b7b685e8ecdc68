pub mod assets;
pub mod health;
pub mod inventory;
pub mod reports;
pub mod work_orders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reports                              list, create
/// /reports/{id}                         get, update, delete
/// /reports/{id}/execute                 run a saved report (POST)
/// /reports/{id}/export                  export report rows (?format=csv|json)
/// /reports/sources/{source}/columns     column registry for a data source
///
/// /work-orders                          list (?status=), create
/// /work-orders/{id}                     get, update, delete
///
/// /assets                               list, create
/// /assets/{id}                          get, update, delete
///
/// /inventory                            list, create
/// /inventory/{id}                       get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Saved report configurations, execution, and export.
        .nest("/reports", reports::router())
        // Maintenance work orders.
        .nest("/work-orders", work_orders::router())
        // Physical assets under maintenance.
        .nest("/assets", assets::router())
        // Spare-part inventory.
        .nest("/inventory", inventory::router())
}
