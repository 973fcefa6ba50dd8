use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::Recommender,
};

pub mod fans;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub recommender: Recommender,
    /// Result count used when a request doesn't specify one
    pub default_result_count: usize,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/:username/recommendations",
            get(recommendations::recommend),
        )
        .route("/titles/:item_id/fans", get(fans::fans))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
