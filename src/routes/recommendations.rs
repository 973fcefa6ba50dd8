use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::Recommendation,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub count: Option<usize>,
    #[serde(default = "default_filter_completed")]
    pub filter_completed: bool,
}

fn default_filter_completed() -> bool {
    true
}

/// Handler for the per-user recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(username): Path<String>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    if username.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Username cannot be empty".to_string(),
        ));
    }

    let count = params.count.unwrap_or(state.default_result_count);

    tracing::info!(
        request_id = %request_id,
        username = %username,
        count = count,
        filter_completed = params.filter_completed,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .get_recommendations(&username, count, params.filter_completed)
        .await?;

    Ok(Json(recommendations))
}
