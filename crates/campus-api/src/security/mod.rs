pub mod admin;

pub use admin::{AdminGate, Claims, RequireAdmin, ADMIN_ROLE};
