//! Common types

use uuid::Uuid;

/// Internal record identifier, generated when a record is created.
pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}
