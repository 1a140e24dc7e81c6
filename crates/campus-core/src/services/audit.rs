//! Audit trail of resource lifecycle events

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Read,
    ReadMany,
    Updated,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Read => "read",
            Self::ReadMany => "read_many",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub resource: &'static str,
    pub action: AuditAction,
    pub records: Vec<Value>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(resource: &'static str, action: AuditAction, records: Vec<Value>) -> Self {
        Self {
            resource,
            action,
            records,
            occurred_at: Utc::now(),
        }
    }
}

/// Sink for audit events. Recording is fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait AuditLogger: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Writes audit events as structured `tracing` records under the `audit` target.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn record(&self, event: AuditEvent) {
        let records = Value::Array(event.records);
        info!(
            target: "audit",
            resource = event.resource,
            action = event.action.as_str(),
            occurred_at = %event.occurred_at.to_rfc3339(),
            records = %records,
            "{} {}",
            event.resource,
            event.action.as_str()
        );
    }
}
