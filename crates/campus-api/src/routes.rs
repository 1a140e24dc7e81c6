use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use campus_core::{Resource, Tag, University};

use crate::handlers::{health, resource};
use crate::state::{AppState, ResourceState};

/// The five CRUD routes for `R` under `/api/{R::PATH}`.
pub fn resource_router<R: Resource>(state: ResourceState<R>) -> Router {
    let collection_path = format!("/api/{}", R::PATH);
    let item_path = format!("{}/{{key}}", collection_path);

    Router::new()
        .route(
            &collection_path,
            get(resource::list::<R>).post(resource::create::<R>),
        )
        .route(
            &item_path,
            get(resource::find_by_key::<R>)
                .put(resource::update_by_key::<R>)
                .delete(resource::delete_by_key::<R>),
        )
        .with_state(state)
}

pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .with_state(state.clone());

    Router::new()
        .merge(health_routes)
        .merge(resource_router(ResourceState::<University>::from_app(&state)))
        .merge(resource_router(ResourceState::<Tag>::from_app(&state)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
