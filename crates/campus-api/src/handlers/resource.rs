// ============================================================================
// Campus API - Resource Handlers
// File: crates/campus-api/src/handlers/resource.rs
// ============================================================================
//! The five CRUD handlers, generic over the resource type.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use campus_core::repositories::Filter;
use campus_core::Resource;

use crate::error::ApiError;
use crate::response::{Message, NOT_FOUND_MSG, NO_DOCUMENTS_MSG};
use crate::security::RequireAdmin;
use crate::state::ResourceState;

/// POST /api/{resource}
pub async fn create<R: Resource>(
    State(state): State<ResourceState<R>>,
    _admin: RequireAdmin,
    Json(draft): Json<R::Draft>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let record = state.service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/{resource}?field=value
pub async fn list<R: Resource>(
    State(state): State<ResourceState<R>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<R>>, ApiError> {
    let filter = Filter::from(params);
    state
        .service
        .list(&filter)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NO_DOCUMENTS_MSG))
}

/// GET /api/{resource}/{key}
pub async fn find_by_key<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(key): Path<String>,
) -> Result<Json<R>, ApiError> {
    state
        .service
        .get(&key)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND_MSG))
}

/// PUT /api/{resource}/{key}
pub async fn update_by_key<R: Resource>(
    State(state): State<ResourceState<R>>,
    _admin: RequireAdmin,
    Path(key): Path<String>,
    Json(patch): Json<R::Patch>,
) -> Result<Json<R>, ApiError> {
    state
        .service
        .update(&key, patch)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND_MSG))
}

/// DELETE /api/{resource}/{key}
pub async fn delete_by_key<R: Resource>(
    State(state): State<ResourceState<R>>,
    _admin: RequireAdmin,
    Path(key): Path<String>,
) -> Result<Json<Message>, ApiError> {
    state
        .service
        .delete(&key)
        .await?
        .map(|_| Json(Message::ok()))
        .ok_or(ApiError::NotFound(NOT_FOUND_MSG))
}
