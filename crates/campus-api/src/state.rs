use std::sync::Arc;

use axum::extract::FromRef;

use campus_core::repositories::DocumentStore;
use campus_core::services::{AuditLogger, ResourceService};
use campus_core::Resource;

use crate::security::AdminGate;

/// Application state shared across routers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub audit: Arc<dyn AuditLogger>,
    pub gate: Arc<AdminGate>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, audit: Arc<dyn AuditLogger>, gate: AdminGate) -> Self {
        Self {
            store,
            audit,
            gate: Arc::new(gate),
        }
    }
}

/// State of one resource router.
pub struct ResourceState<R: Resource> {
    pub service: ResourceService<R>,
    pub gate: Arc<AdminGate>,
}

impl<R: Resource> ResourceState<R> {
    pub fn from_app(state: &AppState) -> Self {
        Self {
            service: ResourceService::new(Arc::clone(&state.store), Arc::clone(&state.audit)),
            gate: Arc::clone(&state.gate),
        }
    }
}

impl<R: Resource> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<R: Resource> FromRef<ResourceState<R>> for Arc<AdminGate> {
    fn from_ref(state: &ResourceState<R>) -> Self {
        Arc::clone(&state.gate)
    }
}
