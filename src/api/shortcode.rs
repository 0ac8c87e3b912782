use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use scoped_search::shortcode::{render_search_form, render_trend_alert_form};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchFormQuery {
    #[serde(default)]
    pub id: Option<String>,
    /// Term echoed back into the input / 回显到输入框的搜索词
    #[serde(default)]
    pub custom_search_term: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendAlertFormQuery {
    #[serde(default)]
    pub trend_alert_term: Option<String>,
}

/// GET /shortcode/customizable_search_form - 渲染可配置搜索表单
pub async fn customizable_search_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchFormQuery>,
) -> Html<String> {
    Html(render_search_form(
        query.id.as_deref(),
        query.custom_search_term.as_deref().unwrap_or_default(),
        &state.nonces,
        &state.config.server.search_path,
        Utc::now().timestamp(),
    ))
}

/// GET /shortcode/trend_alert_search_form - 渲染趋势提醒搜索表单
pub async fn trend_alert_search_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendAlertFormQuery>,
) -> Html<String> {
    Html(render_trend_alert_form(
        query.trend_alert_term.as_deref().unwrap_or_default(),
        &state.nonces,
        &state.config.server.search_path,
        Utc::now().timestamp(),
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use scoped_search::shortcode::MISSING_FORM_ID_MESSAGE;
    use crate::api::test_support::{send, send_json, test_app};

    fn field_value<'a>(html: &'a str, name: &str) -> &'a str {
        let needle = format!("name=\"{}\" value=\"", name);
        let start = html.find(&needle).unwrap() + needle.len();
        let end = html[start..].find('"').unwrap();
        &html[start..start + end]
    }

    #[tokio::test]
    async fn test_missing_id_renders_inline_error() {
        let (app, _) = test_app().await;
        let (status, html) = send(&app, Request::get("/shortcode/customizable_search_form").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(html, MISSING_FORM_ID_MESSAGE);
    }

    #[tokio::test]
    async fn test_rendered_form_round_trips_through_search() {
        let (app, state) = test_app().await;
        sqlx::query("INSERT INTO posts (title, content, post_type, post_status, created_at) VALUES ('Winter sale', '', 'post', 'publish', '2025-01-01')")
            .execute(&state.db)
            .await
            .unwrap();

        let (_, html) = send(&app, Request::get("/shortcode/customizable_search_form?id=general").body(Body::empty()).unwrap()).await;
        assert!(html.contains("action=\"/search\""));
        let token = field_value(&html, "customizable_search_nonce").to_string();

        let uri = format!(
            "/search?s=search-trigger&customizable_search_active=general&customizable_search_nonce={}&custom_search_term=sale",
            token
        );
        let (status, body) = send_json(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["mode"], "scoped");
        assert_eq!(body["data"]["form"]["kind"], "general");
        assert_eq!(body["data"]["total"], 1);
    }

    #[tokio::test]
    async fn test_trend_alert_form_echoes_term() {
        let (app, _) = test_app().await;
        let (status, html) = send(&app, Request::get("/shortcode/trend_alert_search_form?trend_alert_term=Q3").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("name=\"trend_alert_term\" placeholder=\"Search\" value=\"Q3\""));
        assert_eq!(field_value(&html, "trend_alert_search"), "1");
    }
}
