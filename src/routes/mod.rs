use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::request_id,
    services::{MetadataProvider, Recommender},
    storage::{ListRepository, ListService},
};

pub mod catalog;
pub mod list;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub provider: Arc<dyn MetadataProvider>,
    pub recommender: Recommender,
    pub list: ListService,
}

impl AppState {
    pub fn new(provider: Arc<dyn MetadataProvider>, repository: Arc<dyn ListRepository>) -> Self {
        Self {
            recommender: Recommender::new(provider.clone()),
            list: ListService::new(repository),
            provider,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_id::make_span_with_request_id))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(middleware)
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Catalog proxy
        .route("/trending", get(catalog::trending))
        .route("/search", get(catalog::search))
        .route("/credits", get(catalog::credits))
        .route(
            "/title-recommendations",
            get(catalog::title_recommendations),
        )
        // Actor-based recommendations
        .route("/recommendations", post(recommendations::recommend))
        // Saved list
        .route("/list", get(list::get_list))
        .route("/list/items", post(list::add_item))
        .route("/list/items/:id", delete(list::remove_item))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
