//! In-process document store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use campus_core::domain::Collection;
use campus_core::error::DomainError;
use campus_core::repositories::{Document, DocumentStore, Filter};

/// Collections kept in insertion order behind one lock. The lock is never
/// held across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: &Collection) -> usize {
        self.collections
            .read()
            .get(collection.name)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &Collection) -> bool {
        self.len(collection) == 0
    }
}

fn position(documents: &[Document], collection: &Collection, key: &str) -> Option<usize> {
    documents
        .iter()
        .position(|doc| collection.key_of(doc) == Some(key))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &Collection, document: Document) -> Result<Document, DomainError> {
        let key = collection
            .key_of(&document)
            .ok_or_else(|| {
                DomainError::ValidationError(format!("missing key field `{}`", collection.key_field))
            })?
            .to_string();

        let mut collections = self.collections.write();
        let documents = collections.entry(collection.name).or_default();
        if position(documents, collection, &key).is_some() {
            return Err(DomainError::DuplicateKey {
                collection: collection.name.to_string(),
                key,
            });
        }

        documents.push(document.clone());
        debug!("Inserted {} into {}", key, collection.name);
        Ok(document)
    }

    async fn find(&self, collection: &Collection, filter: &Filter) -> Result<Option<Vec<Document>>, DomainError> {
        let collections = self.collections.read();
        let matched = collections
            .get(collection.name)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(Some(matched))
    }

    async fn find_one(&self, collection: &Collection, key: &str) -> Result<Option<Document>, DomainError> {
        let collections = self.collections.read();
        Ok(collections.get(collection.name).and_then(|documents| {
            position(documents, collection, key).map(|i| documents[i].clone())
        }))
    }

    async fn find_one_and_update(
        &self,
        collection: &Collection,
        key: &str,
        mut changes: Document,
    ) -> Result<Option<Document>, DomainError> {
        collection.strip_protected(&mut changes);

        let mut collections = self.collections.write();
        let Some(documents) = collections.get_mut(collection.name) else {
            return Ok(None);
        };
        let Some(i) = position(documents, collection, key) else {
            return Ok(None);
        };

        let document = &mut documents[i];
        document.extend(changes);
        Ok(Some(document.clone()))
    }

    async fn find_one_and_delete(&self, collection: &Collection, key: &str) -> Result<Option<Document>, DomainError> {
        let mut collections = self.collections.write();
        let Some(documents) = collections.get_mut(collection.name) else {
            return Ok(None);
        };
        Ok(position(documents, collection, key).map(|i| documents.remove(i)))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
