//! Tag entity

use serde::{Deserialize, Serialize};
use validator::Validate;

use campus_shared::EntityId;

use super::patch::{nullable, Nullable};
use super::resource::{Collection, Resource};
use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: EntityId,

    #[validate(length(min = 1, max = 64, message = "Name must be between 1 and 64 characters"))]
    pub name: String,

    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagDraft {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
}

impl Resource for Tag {
    type Draft = TagDraft;
    type Patch = TagPatch;

    const ENTITY: &'static str = "Tag";
    const PATH: &'static str = "tag";
    const COLLECTION: Collection = Collection::new("tags", "slug");

    fn slug_source(draft: &TagDraft) -> &str {
        &draft.name
    }

    fn build(id: EntityId, slug: String, draft: TagDraft) -> Result<Self, DomainError> {
        let tag = Self {
            id,
            name: draft.name.trim().to_string(),
            slug,
            description: draft.description,
        };
        tag.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        Ok(tag)
    }

    fn key(&self) -> &str {
        &self.slug
    }
}
