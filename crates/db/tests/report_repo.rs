//! Integration tests for the saved-report repository.

use sqlx::PgPool;

use upkeep_core::report::ReportConfiguration;
use upkeep_db::models::report::{CreateReport, UpdateReport};
use upkeep_db::repositories::ReportRepo;

fn sample_config() -> ReportConfiguration {
    serde_json::from_value(serde_json::json!({
        "columns": ["woNumber", "status"],
        "filters": [{"field": "status", "operator": "eq", "value": "open"}]
    }))
    .unwrap()
}

fn new_report(name: &str) -> CreateReport {
    CreateReport {
        name: name.to_string(),
        description: Some("weekly".to_string()),
        report_type: "work_order".to_string(),
        config: sample_config(),
        is_public: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_roundtrip(pool: PgPool) {
    let created = ReportRepo::create(&pool, &new_report("Open orders")).await.unwrap();
    assert_eq!(created.name, "Open orders");
    assert_eq!(created.report_type, "work_order");
    assert!(!created.is_public);
    assert!(created.last_generated_at.is_none());

    let found = ReportRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    // The stored config document survives the JSONB roundtrip.
    assert_eq!(found.config["columns"][0], "woNumber");
    assert_eq!(found.config["filters"][0]["operator"], "eq");
}

#[sqlx::test(migrations = "./migrations")]
async fn update_applies_only_provided_fields(pool: PgPool) {
    let created = ReportRepo::create(&pool, &new_report("Before")).await.unwrap();

    let input = UpdateReport {
        name: Some("After".to_string()),
        description: None,
        config: None,
        is_public: Some(true),
    };
    let updated = ReportRepo::update(&pool, created.id, &input)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "After");
    assert!(updated.is_public);
    // Omitted fields keep their stored values.
    assert_eq!(updated.description.as_deref(), Some("weekly"));
    assert_eq!(updated.config, created.config);
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_returns_newest_first_with_total(pool: PgPool) {
    for name in ["first", "second", "third"] {
        ReportRepo::create(&pool, &new_report(name)).await.unwrap();
    }

    let page = ReportRepo::list(&pool, Some(2), None).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "third");

    let total = ReportRepo::count(&pool).await.unwrap();
    assert_eq!(total, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_reports_whether_a_row_was_removed(pool: PgPool) {
    let created = ReportRepo::create(&pool, &new_report("Doomed")).await.unwrap();

    assert!(ReportRepo::delete(&pool, created.id).await.unwrap());
    assert!(!ReportRepo::delete(&pool, created.id).await.unwrap());
    assert!(ReportRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}
