//! # Campus Infrastructure
//!
//! Document store and audit sink implementations (adapters).

pub mod audit;
pub mod database;
pub mod memory;

pub use audit::{AuditQueueConfig, AuditWorkers, PgAuditLogger};
pub use database::{create_pool, run_migrations, PgDocumentStore};
pub use memory::MemoryStore;
