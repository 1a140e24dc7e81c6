// ============================================================================
// Campus Core - University Entity
// File: crates/campus-core/src/domain/university.rs
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

use campus_shared::EntityId;

use super::patch::{nullable, Nullable};
use super::resource::{Collection, Resource};
use crate::error::DomainError;

/// One way of reaching a university, e.g. `{ "type": "website", "value": "https://mit.edu" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// University profile.
///
/// `avg_gre`, `avg_lang` and `fees` are unset by default and serialise as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct University {
    #[serde(rename = "_id")]
    pub id: EntityId,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default)]
    pub contacts: Vec<Contact>,

    /// Average GRE score required for acceptance
    #[serde(default)]
    pub avg_gre: Option<f64>,

    /// Average language test score (TOEFL/IELTS) required for acceptance
    #[serde(default)]
    pub avg_lang: Option<f64>,

    #[serde(default)]
    pub fees: Option<f64>,
}

/// Create body. Every field may be omitted; a missing name fails validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniversityDraft {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    pub avg_gre: Option<f64>,
    pub avg_lang: Option<f64>,
    pub fees: Option<f64>,
}

/// Update body. Only the fields present are written; an explicit `null`
/// clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniversityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub address: Nullable<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub avg_gre: Nullable<f64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub avg_lang: Nullable<f64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub fees: Nullable<f64>,
}

impl Resource for University {
    type Draft = UniversityDraft;
    type Patch = UniversityPatch;

    const ENTITY: &'static str = "University";
    const PATH: &'static str = "university";
    const COLLECTION: Collection = Collection::new("universities", "slug");

    fn slug_source(draft: &UniversityDraft) -> &str {
        &draft.name
    }

    fn build(id: EntityId, slug: String, draft: UniversityDraft) -> Result<Self, DomainError> {
        let university = Self {
            id,
            name: draft.name.trim().to_string(),
            slug,
            description: draft.description,
            address: draft.address,
            contacts: draft.contacts,
            avg_gre: draft.avg_gre,
            avg_lang: draft.avg_lang,
            fees: draft.fees,
        };

        university
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        Ok(university)
    }

    fn key(&self) -> &str {
        &self.slug
    }
}
