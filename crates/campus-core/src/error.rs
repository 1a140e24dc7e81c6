//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate key in {collection}: {key}")]
    DuplicateKey { collection: String, key: String },

    #[error("Unable to generate unique slug from: {0}")]
    UnableToGenerateUniqueSlug(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
