//! Domain services

pub mod audit;
pub mod resource_service;

pub use audit::{AuditAction, AuditEvent, AuditLogger, TracingAuditLogger};
pub use resource_service::ResourceService;
