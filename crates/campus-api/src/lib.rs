//! # Campus API
//!
//! HTTP handlers, the generic resource router, and the admin gate.

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod security;
pub mod state;

pub use error::ApiError;
pub use routes::{build_router, resource_router};
pub use state::{AppState, ResourceState};
