use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use scoped_search::error::SearchError;
use scoped_search::models::{CreateSearchFormRequest, SearchForm, SearchFormDetail, UpdateSearchFormRequest};
use scoped_search::settings::save_form_scope;
use scoped_search::store::FormStore;
use scoped_search::utils::sanitize_text_field;
use crate::api::{error_response, ApiError, ApiResponse};
use crate::auth::require_admin;
use crate::state::AppState;

fn clean_title(raw: &str) -> Result<String, ApiError> {
    let title = sanitize_text_field(raw);
    if title.is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(ApiResponse::error("Form title is required"))));
    }
    Ok(title)
}

async fn form_detail(state: &AppState, form: SearchForm) -> Result<SearchFormDetail, ApiError> {
    let post_types = state.store.get_form_scope(form.id).await.map_err(error_response)?;
    let shortcode = form.shortcode();
    Ok(SearchFormDetail { form, post_types, shortcode })
}

/// GET /api/admin/forms - 搜索表单列表
pub async fn list_forms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<SearchFormDetail>>>, ApiError> {
    require_admin(&headers, &state)?;
    let forms = state.store.list_forms().await.map_err(error_response)?;
    let mut details = Vec::with_capacity(forms.len());
    for form in forms {
        details.push(form_detail(&state, form).await?);
    }
    Ok(Json(ApiResponse::success(details)))
}

/// POST /api/admin/forms - 创建搜索表单
pub async fn create_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateSearchFormRequest>,
) -> Result<Json<ApiResponse<SearchFormDetail>>, ApiError> {
    require_admin(&headers, &state)?;
    let title = clean_title(&req.title)?;
    let form = state.store.create_form(&title).await.map_err(error_response)?;
    save_form_scope(&state.store, form.id, Some(&req.post_types)).await.map_err(error_response)?;
    tracing::info!("Search form created: id={}", form.id);
    Ok(Json(ApiResponse::success(form_detail(&state, form).await?)))
}

/// GET /api/admin/forms/:id - 获取搜索表单
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SearchFormDetail>>, ApiError> {
    require_admin(&headers, &state)?;
    let form = state.store.get_form(id).await
        .map_err(error_response)?
        .ok_or_else(|| error_response(SearchError::FormNotFound(id)))?;
    Ok(Json(ApiResponse::success(form_detail(&state, form).await?)))
}

/// POST /api/admin/forms/:id - 更新搜索表单
///
/// A missing `post_types` clears the form's selection, which makes it search
/// the fallback type.
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSearchFormRequest>,
) -> Result<Json<ApiResponse<SearchFormDetail>>, ApiError> {
    require_admin(&headers, &state)?;
    if let Some(title) = req.title.as_deref() {
        let title = clean_title(title)?;
        state.store.rename_form(id, &title).await.map_err(error_response)?;
    }
    save_form_scope(&state.store, id, req.post_types.as_deref()).await.map_err(error_response)?;

    let form = state.store.get_form(id).await
        .map_err(error_response)?
        .ok_or_else(|| error_response(SearchError::FormNotFound(id)))?;
    Ok(Json(ApiResponse::success(form_detail(&state, form).await?)))
}

/// POST /api/admin/forms/:id/delete - 删除搜索表单
pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&headers, &state)?;
    if !state.store.delete_form(id).await.map_err(error_response)? {
        return Err(error_response(SearchError::FormNotFound(id)));
    }
    tracing::info!("Search form deleted: id={}", id);
    Ok(Json(ApiResponse::success(())))
}
