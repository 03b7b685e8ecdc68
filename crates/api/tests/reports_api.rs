//! HTTP-level integration tests for the report endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener. Source rows are seeded through the
//! repository layer to keep the tests focused on HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, build_test_app, delete, get, post_empty, post_json, put_json};
use sqlx::PgPool;
use upkeep_db::models::work_order::CreateWorkOrder;
use upkeep_db::repositories::WorkOrderRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_work_order(n: u32, status: &str, cost: Option<f64>) -> CreateWorkOrder {
    CreateWorkOrder {
        wo_number: format!("WO-{n:03}"),
        title: format!("Task {n}"),
        description: None,
        status: Some(status.to_string()),
        priority: None,
        is_emergency: None,
        asset_id: None,
        assigned_to: None,
        total_cost: cost,
        actual_cost: None,
        labor_hours: None,
        due_date: None,
    }
}

/// Seed 8 completed work orders (WO-001..WO-008, costs 10.0..80.0)
/// and 4 open ones.
async fn seed_work_orders(pool: &PgPool) {
    for n in 1..=8u32 {
        WorkOrderRepo::create(pool, &new_work_order(n, "completed", Some(f64::from(n) * 10.0)))
            .await
            .unwrap();
    }
    for n in 9..=12u32 {
        WorkOrderRepo::create(pool, &new_work_order(n, "open", None))
            .await
            .unwrap();
    }
}

fn completed_report_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Completed work orders",
        "reportType": "work_order",
        "config": {
            "columns": ["woNumber", "status", "totalCost"],
            "filters": [{"field": "status", "operator": "eq", "value": "completed"}],
            "sorting": [{"field": "woNumber", "order": "asc"}]
        }
    })
}

/// POST a report and return its id.
async fn create_report(pool: &PgPool, body: serde_json::Value) -> i64 {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/reports", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Saved report CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_report_returns_201(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/reports",
        completed_report_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Completed work orders");
    assert_eq!(json["data"]["reportType"], "work_order");
    assert!(json["data"]["lastGeneratedAt"].is_null());
    assert!(json["data"]["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_report_with_unknown_filter_field_returns_400(pool: PgPool) {
    let mut body = completed_report_body();
    body["config"]["filters"][0]["field"] = "definitelyNotAField".into();

    let response = post_json(build_test_app(pool), "/api/v1/reports", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_FILTER_FIELD");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_report_with_unknown_source_returns_400(pool: PgPool) {
    let mut body = completed_report_body();
    body["reportType"] = "timesheet".into();

    let response = post_json(build_test_app(pool), "/api/v1/reports", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNKNOWN_DATA_SOURCE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_report_rejects_invalid_replacement_config(pool: PgPool) {
    let id = create_report(&pool, completed_report_body()).await;

    // Asset fields are not valid against a work_order report.
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/reports/{id}"),
        serde_json::json!({"config": {"columns": ["serialNumber"]}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Renaming alone is fine; the stored config stays untouched.
    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/reports/{id}"),
        serde_json::json!({"name": "Renamed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["config"]["columns"][0], "woNumber");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_report_then_get_returns_404(pool: PgPool) {
    let id = create_report(&pool, completed_report_body()).await;

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/reports/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool), &format!("/api/v1/reports/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Column registry endpoint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn source_columns_lists_the_registry(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/reports/sources/work_order/columns",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let columns = json["data"].as_array().unwrap();

    let wo_number = columns
        .iter()
        .find(|c| c["field"] == "woNumber")
        .expect("registry should expose woNumber");
    assert_eq!(wo_number["label"], "WO Number");
    assert_eq!(wo_number["type"], "string");

    let total_cost = columns.iter().find(|c| c["field"] == "totalCost").unwrap();
    assert_eq!(total_cost["type"], "number");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn source_columns_for_unknown_source_returns_400(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/reports/sources/timesheet/columns",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNKNOWN_DATA_SOURCE");
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn execute_filters_sorts_and_pages(pool: PgPool) {
    seed_work_orders(&pool).await;
    let id = create_report(&pool, completed_report_body()).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/reports/{id}/execute"),
        serde_json::json!({"limit": 5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let result = &json["data"];
    let rows = result["data"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(result["metadata"]["total"], 8);
    assert_eq!(result["pageInfo"]["page"], 1);
    assert_eq!(result["pageInfo"]["totalPages"], 2);

    // Filtered to completed only, sorted ascending by number.
    assert_eq!(rows[0]["woNumber"], "WO-001");
    assert_eq!(rows[4]["woNumber"], "WO-005");
    assert!(rows.iter().all(|r| r["status"] == "completed"));

    // Row objects carry the requested columns in requested order.
    let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["woNumber", "status", "totalCost"]);

    // Page 2 picks up exactly the remaining rows, no overlap.
    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/reports/{id}/execute"),
        serde_json::json!({"limit": 5, "page": 2}),
    )
    .await;
    let json = body_json(response).await;
    let rows = json["data"]["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["woNumber"], "WO-006");
    assert_eq!(json["data"]["pageInfo"]["page"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn execute_without_body_uses_saved_config(pool: PgPool) {
    seed_work_orders(&pool).await;
    let id = create_report(&pool, completed_report_body()).await;

    let response = post_empty(
        build_test_app(pool),
        &format!("/api/v1/reports/{id}/execute"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["data"].as_array().unwrap().len(), 8);
    assert_eq!(json["data"]["pageInfo"]["limit"], 50);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn execute_computes_grouped_aggregations(pool: PgPool) {
    seed_work_orders(&pool).await;
    let id = create_report(
        &pool,
        serde_json::json!({
            "name": "Cost by status",
            "reportType": "work_order",
            "config": {
                "columns": ["status"],
                "groupBy": ["status"],
                "aggregations": [
                    {"function": "count"},
                    {"field": "totalCost", "function": "sum"}
                ]
            }
        }),
    )
    .await;

    let response = post_empty(
        build_test_app(pool),
        &format!("/api/v1/reports/{id}/execute"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let aggregations = &json["data"]["aggregations"];
    assert_eq!(aggregations["completed"]["count"], 8);
    // 10 + 20 + ... + 80
    assert_eq!(aggregations["completed"]["sum_totalCost"], 360.0);
    assert_eq!(aggregations["open"]["count"], 4);
    // SUM over only-NULL costs is SQL NULL.
    assert!(aggregations["open"]["sum_totalCost"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn execute_touches_last_generated_at_on_success(pool: PgPool) {
    seed_work_orders(&pool).await;
    let id = create_report(&pool, completed_report_body()).await;

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/reports/{id}")).await;
    assert!(body_json(response).await["data"]["lastGeneratedAt"].is_null());

    let response = post_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/reports/{id}/execute"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(build_test_app(pool), &format!("/api/v1/reports/{id}")).await;
    assert!(body_json(response).await["data"]["lastGeneratedAt"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn execute_nonexistent_report_returns_404(pool: PgPool) {
    let response = post_empty(build_test_app(pool), "/api/v1/reports/999999/execute").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn export_csv_renders_header_and_rows(pool: PgPool) {
    seed_work_orders(&pool).await;
    let id = create_report(&pool, completed_report_body()).await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/reports/{id}/export?format=csv"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(".csv"));

    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("woNumber,status,totalCost"));
    assert_eq!(lines.next(), Some("WO-001,completed,10.0"));
    assert_eq!(csv.lines().count(), 9);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_json_returns_execution_result(pool: PgPool) {
    seed_work_orders(&pool).await;
    let id = create_report(&pool, completed_report_body()).await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/reports/{id}/export?format=json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["data"].as_array().unwrap().len(), 8);
    assert_eq!(json["data"]["metadata"]["reportName"], "Completed work orders");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_with_unknown_format_returns_400(pool: PgPool) {
    let id = create_report(&pool, completed_report_body()).await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/reports/{id}/export?format=xlsx"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
