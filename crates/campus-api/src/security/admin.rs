//! Admin-only gate for mutating resource routes

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use campus_shared::config::AuthSettings;
use campus_shared::AppError;

use crate::error::ApiError;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

/// Verifies HS256 bearer tokens carrying `role = "admin"`.
pub enum AdminGate {
    /// Every request is admitted.
    Disabled,
    Enabled {
        decoding_key: DecodingKey,
        validation: Validation,
    },
}

impl AdminGate {
    pub fn disabled() -> Self {
        AdminGate::Disabled
    }

    pub fn hs256(secret: &str) -> Self {
        AdminGate::Enabled {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AppError> {
        if !settings.enabled {
            return Ok(Self::disabled());
        }
        match settings.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(Self::hs256(secret)),
            _ => Err(AppError::InternalError(
                "auth.enabled requires auth.jwt_secret".to_string(),
            )),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AdminGate::Enabled { .. })
    }

    /// `None` when the gate is disabled, the admin's claims otherwise.
    pub fn authorize(&self, authorization: Option<&str>) -> Result<Option<Claims>, ApiError> {
        let AdminGate::Enabled { decoding_key, validation } = self else {
            return Ok(None);
        };

        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let claims = decode::<Claims>(token, decoding_key, validation)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?
            .claims;

        if claims.role != ADMIN_ROLE {
            return Err(ApiError::Forbidden(format!(
                "subject {} has role {}",
                claims.sub, claims.role
            )));
        }

        debug!("Admin {} authorized", claims.sub);
        Ok(Some(claims))
    }
}

/// Sign a token the gate accepts. Used by operators and tests.
pub fn issue_token(secret: &str, sub: &str, role: &str, ttl_secs: i64) -> Result<String, AppError> {
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp: chrono::Utc::now().timestamp() + ttl_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Extractor that rejects the request unless the gate admits it.
pub struct RequireAdmin(pub Option<Claims>);

impl<S> FromRequestParts<S> for RequireAdmin
where
    Arc<AdminGate>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Arc::<AdminGate>::from_ref(state);
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        gate.authorize(authorization).map(RequireAdmin)
    }
}
