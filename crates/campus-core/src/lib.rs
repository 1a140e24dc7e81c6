//! # Campus Core
//!
//! Domain records, the generic resource service, and the storage and audit
//! ports it depends on.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use error::DomainError;
