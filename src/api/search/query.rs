use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use scoped_search::search::{run_search, SearchParams, SearchRequest};
use crate::api::{error_response, ApiError, ApiResponse};
use crate::state::AppState;
use super::types::SearchResponse;

/// GET /search - 站点搜索（表单提交目标）
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let request = SearchRequest::from_params(&params);
    let now = Utc::now().timestamp();

    let outcome = run_search(&state.store, &state.engine, &state.nonces, &request, now)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(SearchResponse::from(outcome))))
}
