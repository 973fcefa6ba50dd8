use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Fan, ItemId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct FansQuery {
    pub count: Option<usize>,
    #[serde(default = "default_with_scores")]
    pub with_scores: bool,
}

fn default_with_scores() -> bool {
    true
}

/// Handler for the per-title fans endpoint
pub async fn fans(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(item_id): Path<ItemId>,
    Query(params): Query<FansQuery>,
) -> AppResult<Json<Vec<Fan>>> {
    let count = params.count.unwrap_or(state.default_result_count);

    tracing::info!(
        request_id = %request_id,
        item_id = item_id,
        count = count,
        with_scores = params.with_scores,
        "Processing fans request"
    );

    let fans = state
        .recommender
        .get_fans(item_id, count, params.with_scores)
        .await?;

    Ok(Json(fans))
}
