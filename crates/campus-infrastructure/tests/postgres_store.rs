//! Runs against the database named by `DATABASE_URL`; every test returns
//! early when it is unset.

use std::time::Duration;

use serde_json::{json, Value};
use sqlx::PgPool;

use campus_core::domain::Collection;
use campus_core::error::DomainError;
use campus_core::repositories::{Document, DocumentStore, Filter};
use campus_core::services::{AuditAction, AuditEvent, AuditLogger};
use campus_infrastructure::{
    create_pool, run_migrations, AuditQueueConfig, PgAuditLogger, PgDocumentStore,
};
use campus_shared::new_id;

const FILTER_CASES: Collection = Collection::new("pg_filter_cases", "slug");
const LIFECYCLE: Collection = Collection::new("pg_lifecycle", "slug");

async fn pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let pool = create_pool(&url, 5, 5).await.unwrap();
    run_migrations(&pool).await.unwrap();
    Some(pool)
}

async fn clear_collection(pool: &PgPool, collection: &Collection) {
    sqlx::query("DELETE FROM documents WHERE collection = $1")
        .bind(collection.name)
        .execute(pool)
        .await
        .unwrap();
}

async fn audit_rows(pool: &PgPool, resource: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_events WHERE resource = $1")
        .bind(resource)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn doc(mut value: Value) -> Document {
    value["_id"] = Value::String(new_id().to_string());
    value.as_object().cloned().unwrap()
}

fn slugs(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .filter_map(|d| d["slug"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_sql_filter_agrees_with_in_memory_filter() {
    let Some(pool) = pool().await else { return };
    clear_collection(&pool, &FILTER_CASES).await;
    let store = PgDocumentStore::new(pool);

    let documents = vec![
        doc(json!({ "slug": "mit", "name": "MIT", "fees": 50000, "public": true, "contacts": [], "address": null })),
        doc(json!({ "slug": "yale", "name": "Yale", "fees": 50000.5, "public": false })),
        doc(json!({ "slug": "mit-sloan", "name": "MIT Sloan", "fees": "50000" })),
    ];
    for document in &documents {
        store.insert(&FILTER_CASES, document.clone()).await.unwrap();
    }

    let filters = [
        Filter::new(),
        Filter::new().with("name", "MIT"),
        Filter::new().with("name", "mit"),
        Filter::new().with("fees", "50000"),
        Filter::new().with("fees", "50000.0"),
        Filter::new().with("fees", "5e4"),
        Filter::new().with("fees", "50000.5"),
        Filter::new().with("fees", "NaN"),
        Filter::new().with("fees", "abc"),
        Filter::new().with("public", "true"),
        Filter::new().with("public", "True"),
        Filter::new().with("contacts", "[]"),
        Filter::new().with("address", "null"),
        Filter::new().with("missing", "x"),
        Filter::new().with("name", "MIT").with("fees", "50000"),
    ];

    for filter in &filters {
        let expected: Vec<Document> = documents
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        let found = store.find(&FILTER_CASES, filter).await.unwrap().unwrap();
        assert_eq!(slugs(&found), slugs(&expected), "filter {:?}", filter);
    }
}

#[tokio::test]
async fn test_store_lifecycle() {
    let Some(pool) = pool().await else { return };
    clear_collection(&pool, &LIFECYCLE).await;
    let store = PgDocumentStore::new(pool);

    let original = doc(json!({ "slug": "mit", "name": "MIT", "fees": 50000 }));
    let stored = store.insert(&LIFECYCLE, original.clone()).await.unwrap();
    assert_eq!(stored, original);

    let err = store
        .insert(&LIFECYCLE, doc(json!({ "slug": "mit", "name": "Other" })))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateKey { ref key, .. } if key == "mit"));

    let updated = store
        .find_one_and_update(
            &LIFECYCLE,
            "mit",
            doc(json!({ "fees": null, "address": "Cambridge", "slug": "hijack" })),
        )
        .await
        .unwrap()
        .unwrap();
    assert!(updated["fees"].is_null());
    assert_eq!(updated["address"], "Cambridge");
    assert_eq!(updated["slug"], "mit");
    assert_eq!(updated["_id"], original["_id"]);
    assert_eq!(store.find_one(&LIFECYCLE, "mit").await.unwrap(), Some(updated));

    assert!(store
        .find_one_and_update(&LIFECYCLE, "nowhere", Document::new())
        .await
        .unwrap()
        .is_none());

    assert!(store.find_one_and_delete(&LIFECYCLE, "mit").await.unwrap().is_some());
    assert!(store.find_one_and_delete(&LIFECYCLE, "mit").await.unwrap().is_none());
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
async fn test_audit_flushes_partial_batch_after_timeout() {
    const RESOURCE: &str = "AuditTimeoutCheck";
    let Some(pool) = pool().await else { return };
    sqlx::query("DELETE FROM audit_events WHERE resource = $1")
        .bind(RESOURCE)
        .execute(&pool)
        .await
        .unwrap();

    let (logger, workers) = PgAuditLogger::new(
        pool.clone(),
        AuditQueueConfig {
            queue_capacity: 16,
            batch_size: 10,
            batch_timeout_ms: 50,
            worker_count: 1,
        },
    );
    logger.record(AuditEvent::new(RESOURCE, AuditAction::Created, vec![json!({ "slug": "mit" })]));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(audit_rows(&pool, RESOURCE).await, 1);
    workers.shutdown().await;
}

#[tokio::test]
async fn test_audit_shutdown_drains_queue() {
    const RESOURCE: &str = "AuditDrainCheck";
    let Some(pool) = pool().await else { return };
    sqlx::query("DELETE FROM audit_events WHERE resource = $1")
        .bind(RESOURCE)
        .execute(&pool)
        .await
        .unwrap();

    // A long timeout keeps events queued until shutdown.
    let (logger, workers) = PgAuditLogger::new(
        pool.clone(),
        AuditQueueConfig {
            queue_capacity: 100,
            batch_size: 3,
            batch_timeout_ms: 60_000,
            worker_count: 2,
        },
    );
    for i in 0..7 {
        logger.record(AuditEvent::new(RESOURCE, AuditAction::Read, vec![json!({ "n": i })]));
    }

    workers.shutdown().await;
    assert_eq!(audit_rows(&pool, RESOURCE).await, 7);
}
