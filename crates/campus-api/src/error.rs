use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use campus_core::DomainError;

use crate::response::{Message, INTERNAL_ERROR_MSG};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Anything the handlers do not model becomes a generic 500.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::Unauthorized(reason) => {
                tracing::warn!("Unauthorized: {}", reason);
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ApiError::Forbidden(reason) => {
                tracing::warn!("Forbidden: {}", reason);
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }
            ApiError::Domain(e) => {
                tracing::error!("Unhandled error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MSG.to_string())
            }
        };

        (status, Json(Message::new(msg))).into_response()
    }
}
