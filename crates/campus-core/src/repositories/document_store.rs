//! Document store trait (port)

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::Filter;
use crate::domain::Collection;
use crate::error::DomainError;

/// A stored record as a JSON object.
pub type Document = Map<String, Value>;

/// Collection-oriented persistence. Keyed operations look records up by
/// `collection.key_field`; each call is atomic on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fails with `DuplicateKey` when the key is taken.
    async fn insert(&self, collection: &Collection, document: Document) -> Result<Document, DomainError>;

    /// `None` means the store produced no result object, not an empty match.
    async fn find(&self, collection: &Collection, filter: &Filter) -> Result<Option<Vec<Document>>, DomainError>;

    async fn find_one(&self, collection: &Collection, key: &str) -> Result<Option<Document>, DomainError>;

    /// Shallow-merge `changes` and return the document as stored afterwards.
    /// The identifier and key field are never overwritten.
    async fn find_one_and_update(
        &self,
        collection: &Collection,
        key: &str,
        changes: Document,
    ) -> Result<Option<Document>, DomainError>;

    async fn find_one_and_delete(&self, collection: &Collection, key: &str) -> Result<Option<Document>, DomainError>;

    async fn ping(&self) -> Result<(), DomainError>;
}
