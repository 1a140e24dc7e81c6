//! # Campus Core - Domain Module
//!
//! Resource records exposed through the generic CRUD handler set.

pub mod patch;
pub mod resource;
pub mod slug;
pub mod tag;
pub mod university;

pub use patch::{nullable, Nullable};
pub use resource::{Collection, Resource};
pub use tag::{Tag, TagDraft, TagPatch};
pub use university::{Contact, University, UniversityDraft, UniversityPatch};
