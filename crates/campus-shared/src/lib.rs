//! # Campus Shared
//!
//! Shared configuration, telemetry, and id types for the campus platform.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use error::AppError;
pub use types::*;
