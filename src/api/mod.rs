pub mod forms;
pub mod search;
pub mod server;
pub mod settings;
pub mod shortcode;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use scoped_search::error::SearchError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            code: 400,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn with_code(code: StatusCode, message: &str) -> Self {
        Self {
            code: i32::from(code.as_u16()),
            message: message.to_string(),
            data: None,
        }
    }
}

/// Handler error: HTTP status plus an error envelope / 处理器错误
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a library error to an HTTP response / 将库错误映射为HTTP响应
pub fn error_response(e: SearchError) -> ApiError {
    let status = match &e {
        SearchError::FormNotFound(_) => StatusCode::NOT_FOUND,
        SearchError::InvalidScopeSubmission(_) | SearchError::MissingFormIdentity => StatusCode::BAD_REQUEST,
        SearchError::Database(_) => {
            tracing::error!("Storage failure: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::with_code(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")),
            );
        }
    };
    (status, Json(ApiResponse::with_code(status, &e.to_string())))
}

/// Build the application router / 构建路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/version", get(server::get_version_info))
        // 公开搜索与表单渲染
        .route("/search", get(search::search))
        .route("/shortcode/customizable_search_form", get(shortcode::customizable_search_form))
        .route("/shortcode/trend_alert_search_form", get(shortcode::trend_alert_search_form))
        // 搜索管理API
        .route("/api/admin/settings", get(settings::get_search_settings))
        .route("/api/admin/settings", post(settings::update_search_settings))
        .route("/api/admin/content-types", get(settings::list_content_types))
        .route("/api/admin/forms", get(forms::list_forms))
        .route("/api/admin/forms", post(forms::create_form))
        .route("/api/admin/forms/:id", get(forms::get_form))
        .route("/api/admin/forms/:id", post(forms::update_form))
        .route("/api/admin/forms/:id/delete", post(forms::delete_form))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
