use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use std::sync::Arc;

use scoped_search::models::ContentTypeInfo;
use scoped_search::settings::save_global_scope;
use scoped_search::store::{ContentTypeRegistry, SettingsStore};
use crate::api::{error_response, ApiError, ApiResponse};
use crate::auth::require_admin;
use crate::state::AppState;
use super::types::*;

async fn current_settings(state: &AppState) -> Result<SearchSettingsResponse, ApiError> {
    let post_types = state.store.get_global_scope().await.map_err(error_response)?;
    let available_post_types = state.store.list_public_content_types().await.map_err(error_response)?;
    Ok(SearchSettingsResponse { post_types, available_post_types })
}

/// GET /api/admin/settings - 获取搜索设置（需要管理员权限）
pub async fn get_search_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SearchSettingsResponse>>, ApiError> {
    require_admin(&headers, &state)?;
    Ok(Json(ApiResponse::success(current_settings(&state).await?)))
}

/// POST /api/admin/settings - 更新搜索设置（需要管理员权限）
///
/// Unregistered content types are dropped before saving / 未注册的内容类型在保存前被丢弃
pub async fn update_search_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UpdateSearchSettingsRequest>,
) -> Result<Json<ApiResponse<SearchSettingsResponse>>, ApiError> {
    require_admin(&headers, &state)?;
    save_global_scope(&state.store, &req.post_types).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(current_settings(&state).await?)))
}

/// GET /api/admin/content-types - 列出公开内容类型
pub async fn list_content_types(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<ContentTypeInfo>>>, ApiError> {
    require_admin(&headers, &state)?;
    let types = state.store.list_public_content_types().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(types)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use crate::api::test_support::{admin_get, admin_post, send_json, test_app};

    #[tokio::test]
    async fn test_settings_require_admin_token() {
        let (app, _) = test_app().await;

        let (status, _) = send_json(&app, Request::get("/api/admin/settings").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::get("/api/admin/settings")
            .header("authorization", "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_drops_unregistered_types() {
        let (app, _) = test_app().await;

        let (status, body) = send_json(
            &app,
            admin_post("/api/admin/settings", json!({"post_types": ["page", "bogus", "page", "custom_search_form"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["post_types"], json!(["page"]));

        let (_, body) = send_json(&app, admin_get("/api/admin/settings")).await;
        assert_eq!(body["data"]["post_types"], json!(["page"]));
    }

    #[tokio::test]
    async fn test_list_content_types() {
        let (app, _) = test_app().await;
        let (status, body) = send_json(&app, admin_get("/api/admin/content-types")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["data"].as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["page", "post", "trend-alert"]);
    }
}
