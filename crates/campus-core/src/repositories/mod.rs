//! Repository traits (ports)

pub mod document_store;
pub mod filter;

pub use document_store::{Document, DocumentStore};
pub use filter::Filter;
