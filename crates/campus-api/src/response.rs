//! Message bodies

use serde::{Deserialize, Serialize};

pub const OK_MSG: &str = "ok";
pub const NOT_FOUND_MSG: &str = "Not found";
pub const NO_DOCUMENTS_MSG: &str = "No documents found";
pub const INTERNAL_ERROR_MSG: &str = "Internal Server Error";

/// `{ "msg": ... }`, the body of every non-record response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }

    pub fn ok() -> Self {
        Self::new(OK_MSG)
    }
}
