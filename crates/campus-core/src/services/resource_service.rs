// ============================================================================
// Campus Core - Resource Service
// File: crates/campus-core/src/services/resource_service.rs
// ============================================================================
//! Generic create/list/get/update/delete over one resource collection.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use campus_shared::new_id;

use crate::domain::{slug, Resource};
use crate::error::DomainError;
use crate::repositories::{Document, DocumentStore, Filter};
use crate::services::audit::{AuditAction, AuditEvent, AuditLogger};

/// Upper bound on `-N` suffixes tried before giving up on a slug.
pub const MAX_SLUG_ATTEMPTS: usize = 100;

/// One instance per resource type; every operation is a single store call
/// followed by one audit event.
pub struct ResourceService<R: Resource> {
    store: Arc<dyn DocumentStore>,
    audit: Arc<dyn AuditLogger>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            audit: Arc::clone(&self.audit),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn DocumentStore>, audit: Arc<dyn AuditLogger>) -> Self {
        Self {
            store,
            audit,
            _resource: PhantomData,
        }
    }

    /// Build the record, find a free slug, and insert it.
    pub async fn create(&self, draft: R::Draft) -> Result<R, DomainError> {
        let collection = R::COLLECTION;
        let base = slug::slugify(R::slug_source(&draft));
        let record = R::build(new_id(), base.clone(), draft)?;
        let mut document = to_document(&record)?;

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = slug::candidate(&base, attempt);
            if self.store.find_one(&collection, &candidate).await?.is_some() {
                debug!("{} slug taken: {}", R::ENTITY, candidate);
                continue;
            }

            document.insert(collection.key_field.to_string(), Value::String(candidate.clone()));
            match self.store.insert(&collection, document.clone()).await {
                Ok(stored) => {
                    self.audit.record(AuditEvent::new(
                        R::ENTITY,
                        AuditAction::Created,
                        vec![Value::Object(stored.clone())],
                    ));
                    let created: R = from_document(stored)?;
                    info!("{} created: {}", R::ENTITY, created.key());
                    return Ok(created);
                }
                Err(DomainError::DuplicateKey { key, .. }) => {
                    warn!("{} slug claimed concurrently: {}", R::ENTITY, key);
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::UnableToGenerateUniqueSlug(base))
    }

    /// `None` only when the store yields no result object.
    pub async fn list(&self, filter: &Filter) -> Result<Option<Vec<R>>, DomainError> {
        let Some(documents) = self.store.find(&R::COLLECTION, filter).await? else {
            return Ok(None);
        };

        self.audit.record(AuditEvent::new(
            R::ENTITY,
            AuditAction::ReadMany,
            documents.iter().cloned().map(Value::Object).collect(),
        ));

        documents
            .into_iter()
            .map(from_document)
            .collect::<Result<Vec<R>, _>>()
            .map(Some)
    }

    pub async fn get(&self, key: &str) -> Result<Option<R>, DomainError> {
        let Some(document) = self.store.find_one(&R::COLLECTION, key).await? else {
            return Ok(None);
        };

        self.audit.record(AuditEvent::new(
            R::ENTITY,
            AuditAction::Read,
            vec![Value::Object(document.clone())],
        ));
        from_document(document).map(Some)
    }

    /// Apply the fields present in `patch`; returns the record as updated.
    pub async fn update(&self, key: &str, patch: R::Patch) -> Result<Option<R>, DomainError> {
        let collection = R::COLLECTION;
        let mut changes = to_document(&patch)?;
        collection.strip_protected(&mut changes);

        let Some(document) = self
            .store
            .find_one_and_update(&collection, key, changes)
            .await?
        else {
            return Ok(None);
        };

        info!("{} updated: {}", R::ENTITY, key);
        self.audit.record(AuditEvent::new(
            R::ENTITY,
            AuditAction::Updated,
            vec![Value::Object(document.clone())],
        ));
        from_document(document).map(Some)
    }

    /// Returns the removed record.
    pub async fn delete(&self, key: &str) -> Result<Option<R>, DomainError> {
        let Some(document) = self.store.find_one_and_delete(&R::COLLECTION, key).await? else {
            return Ok(None);
        };

        info!("{} deleted: {}", R::ENTITY, key);
        self.audit.record(AuditEvent::new(
            R::ENTITY,
            AuditAction::Deleted,
            vec![Value::Object(document.clone())],
        ));
        from_document(document).map(Some)
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }
}

fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, DomainError> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(DomainError::InternalError(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn from_document<R: Resource>(document: Document) -> Result<R, DomainError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{University, UniversityDraft, UniversityPatch};
    use crate::repositories::document_store::MockDocumentStore;
    use crate::services::audit::MockAuditLogger;
    use serde_json::json;

    fn draft(name: &str) -> UniversityDraft {
        UniversityDraft {
            name: name.to_string(),
            address: Some("Cambridge, MA".to_string()),
            ..Default::default()
        }
    }

    fn audit_expecting(action: AuditAction, times: usize) -> MockAuditLogger {
        let mut audit = MockAuditLogger::new();
        audit
            .expect_record()
            .withf(move |event| event.resource == "University" && event.action == action)
            .times(times)
            .return_const(());
        audit
    }

    fn service(store: MockDocumentStore, audit: MockAuditLogger) -> ResourceService<University> {
        ResourceService::new(Arc::new(store), Arc::new(audit))
    }

    #[tokio::test]
    async fn test_create_uses_derived_slug() {
        let mut store = MockDocumentStore::new();
        store.expect_find_one().returning(|_, _| Ok(None));
        store
            .expect_insert()
            .withf(|collection, doc| {
                collection.name == "universities" && doc["slug"] == "massachusetts-institute-of-technology"
            })
            .times(1)
            .returning(|_, doc| Ok(doc));

        let svc = service(store, audit_expecting(AuditAction::Created, 1));
        let uni = svc.create(draft("Massachusetts Institute of Technology")).await.unwrap();

        assert_eq!(uni.slug, "massachusetts-institute-of-technology");
        assert_eq!(uni.address.as_deref(), Some("Cambridge, MA"));
    }

    #[tokio::test]
    async fn test_create_suffixes_taken_slug() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find_one()
            .withf(|_, key| key == "mit")
            .returning(|_, _| Ok(Some(json!({"slug": "mit"}).as_object().cloned().unwrap())));
        store
            .expect_find_one()
            .withf(|_, key| key == "mit-2")
            .returning(|_, _| Ok(None));
        store.expect_insert().times(1).returning(|_, doc| Ok(doc));

        let svc = service(store, audit_expecting(AuditAction::Created, 1));
        let uni = svc.create(draft("MIT")).await.unwrap();
        assert_eq!(uni.slug, "mit-2");
    }

    #[tokio::test]
    async fn test_create_retries_after_concurrent_claim() {
        let mut store = MockDocumentStore::new();
        store.expect_find_one().returning(|_, _| Ok(None));
        let mut seq = mockall::Sequence::new();
        store
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Err(DomainError::DuplicateKey {
                    collection: "universities".into(),
                    key: "mit".into(),
                })
            });
        store
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, doc| Ok(doc));

        let svc = service(store, audit_expecting(AuditAction::Created, 1));
        let uni = svc.create(draft("MIT")).await.unwrap();
        assert_eq!(uni.slug, "mit-2");
    }

    #[tokio::test]
    async fn test_create_gives_up_when_slugs_exhausted() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find_one()
            .times(MAX_SLUG_ATTEMPTS)
            .returning(|_, key| Ok(Some(json!({ "slug": key }).as_object().cloned().unwrap())));

        let svc = service(store, audit_expecting(AuditAction::Created, 0));
        let result = svc.create(draft("MIT")).await;
        assert!(matches!(result, Err(DomainError::UnableToGenerateUniqueSlug(base)) if base == "mit"));
    }

    #[tokio::test]
    async fn test_create_propagates_validation_error() {
        let store = MockDocumentStore::new();
        let svc = service(store, audit_expecting(AuditAction::Created, 0));
        let result = svc.create(UniversityDraft::default()).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_list_preserves_missing_result() {
        let mut store = MockDocumentStore::new();
        store.expect_find().returning(|_, _| Ok(None));

        let svc = service(store, audit_expecting(AuditAction::ReadMany, 0));
        assert!(svc.list(&Filter::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_missing_is_none_and_not_audited() {
        let mut store = MockDocumentStore::new();
        store.expect_find_one().returning(|_, _| Ok(None));

        let svc = service(store, audit_expecting(AuditAction::Read, 0));
        assert!(svc.get("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_never_sends_protected_fields() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find_one_and_update()
            .withf(|_, key, changes| {
                key == "mit" && changes.len() == 1 && changes["fees"] == json!(50000.0)
            })
            .returning(|_, _, changes| {
                let mut doc = json!({
                    "_id": "5b2a1c4e-8d7f-4f43-9a56-1b2c3d4e5f60",
                    "name": "MIT",
                    "slug": "mit",
                    "contacts": [],
                    "avg_gre": null,
                    "avg_lang": null,
                    "fees": null
                })
                .as_object()
                .cloned()
                .unwrap();
                doc.extend(changes);
                Ok(Some(doc))
            });

        let svc = service(store, audit_expecting(AuditAction::Updated, 1));
        let patch = UniversityPatch {
            fees: Some(Some(50000.0)),
            ..Default::default()
        };
        let uni = svc.update("mit", patch).await.unwrap().unwrap();
        assert_eq!(uni.fees, Some(50000.0));
        assert_eq!(uni.name, "MIT");
    }

    #[tokio::test]
    async fn test_delete_audits_removed_record() {
        let mut store = MockDocumentStore::new();
        store.expect_find_one_and_delete().returning(|_, _| {
            Ok(Some(
                json!({
                    "_id": "5b2a1c4e-8d7f-4f43-9a56-1b2c3d4e5f60",
                    "name": "MIT",
                    "slug": "mit"
                })
                .as_object()
                .cloned()
                .unwrap(),
            ))
        });

        let svc = service(store, audit_expecting(AuditAction::Deleted, 1));
        let removed = svc.delete("mit").await.unwrap().unwrap();
        assert_eq!(removed.slug, "mit");
        assert!(removed.contacts.is_empty());
    }
}
