//! The contract every CRUD resource implements.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use campus_shared::EntityId;

use crate::error::DomainError;

/// Field holding the internal identifier in every stored document.
pub const ID_FIELD: &str = "_id";

/// Where a resource lives in the document store and which field keys it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub name: &'static str,
    pub key_field: &'static str,
}

impl Collection {
    pub const fn new(name: &'static str, key_field: &'static str) -> Self {
        Self { name, key_field }
    }

    /// External key of a stored document, if present and textual.
    pub fn key_of<'a>(&self, document: &'a Map<String, Value>) -> Option<&'a str> {
        document.get(self.key_field).and_then(Value::as_str)
    }

    /// Drop fields an update must never touch: the identifier and the key.
    pub fn strip_protected(&self, changes: &mut Map<String, Value>) {
        changes.remove(ID_FIELD);
        changes.remove(self.key_field);
    }
}

/// A record type served by the generic resource handlers.
///
/// `Draft` is the create body, `Patch` the partial update body. A patch
/// serialises only the fields it sets.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Draft: DeserializeOwned + Send + 'static;
    type Patch: Serialize + DeserializeOwned + Send + 'static;

    /// Audit tag, e.g. `University`.
    const ENTITY: &'static str;
    /// Path segment under `/api`.
    const PATH: &'static str;
    const COLLECTION: Collection;

    /// Text the slug is derived from.
    fn slug_source(draft: &Self::Draft) -> &str;

    fn build(id: EntityId, slug: String, draft: Self::Draft) -> Result<Self, DomainError>;

    fn key(&self) -> &str;
}
