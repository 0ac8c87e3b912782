//! Search form markup / 搜索表单渲染
//!
//! Rendering is a pure function of the form identity, the current term and a
//! freshly issued token.

use quick_xml::escape::escape;

use crate::error::{Result, SearchError};
use crate::nonce::NonceIssuer;
use crate::search::FormIdentity;
use crate::utils::sanitize_text_field;

/// Shortcode tag of the configurable search form / 可配置搜索表单的短代码标签
pub const SEARCH_FORM_TAG: &str = "customizable_search_form";

/// Rendered in place of a form without a usable id / 缺少有效ID时的提示
pub const MISSING_FORM_ID_MESSAGE: &str = "<p>Error: Search form ID is required.</p>";

/// Value of the hidden `s` field that triggers the host search / 触发站点搜索的隐藏字段值
const HOST_SEARCH_TRIGGER: &str = "search-trigger";

struct FormFields {
    css_class: &'static str,
    marker_name: &'static str,
    nonce_name: &'static str,
    term_name: &'static str,
}

const CUSTOMIZABLE_FIELDS: FormFields = FormFields {
    css_class: "customizable-search-form",
    marker_name: "customizable_search_active",
    nonce_name: "customizable_search_nonce",
    term_name: "custom_search_term",
};

const TREND_ALERT_FIELDS: FormFields = FormFields {
    css_class: "trend-alert-search-form",
    marker_name: "trend_alert_search",
    nonce_name: "trend_alert_search_nonce",
    term_name: "trend_alert_term",
};

fn render(fields: &FormFields, identity: FormIdentity, current_term: &str, token: &str, action_url: &str) -> String {
    let term = sanitize_text_field(current_term);
    format!(
        concat!(
            "<form method=\"get\" action=\"{action}\" role=\"search\" class=\"{class}\">\n",
            "    <input type=\"hidden\" name=\"{nonce_name}\" value=\"{token}\" />\n",
            "    <input type=\"hidden\" name=\"{marker_name}\" value=\"{marker}\" />\n",
            "    <input type=\"hidden\" name=\"s\" value=\"{trigger}\" />\n",
            "    <input type=\"text\" name=\"{term_name}\" placeholder=\"Search\" value=\"{term}\" required aria-label=\"Search\" />\n",
            "    <button type=\"submit\">Search</button>\n",
            "</form>\n"
        ),
        action = escape(action_url),
        class = fields.css_class,
        nonce_name = fields.nonce_name,
        token = escape(token),
        marker_name = fields.marker_name,
        marker = escape(&identity.marker_value()),
        trigger = HOST_SEARCH_TRIGGER,
        term_name = fields.term_name,
        term = escape(&term),
    )
}

/// Identity named by the shortcode's `id` attribute / 短代码 id 属性对应的表单
pub fn form_identity(id: Option<&str>) -> Result<FormIdentity> {
    id.and_then(FormIdentity::parse_marker)
        .ok_or(SearchError::MissingFormIdentity)
}

/// Shortcode text an editor pastes into a page / 可复制的短代码
pub fn search_form_shortcode(form_id: i64) -> String {
    format!("[{} id=\"{}\"]", SEARCH_FORM_TAG, form_id)
}

/// Render `[customizable_search_form id="..."]` / 渲染可配置搜索表单
///
/// `id` accepts `general` or a positive form id; anything else renders
/// [`MISSING_FORM_ID_MESSAGE`].
pub fn render_search_form(id: Option<&str>, current_term: &str, issuer: &NonceIssuer, action_url: &str, now: i64) -> String {
    let identity = match form_identity(id) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!("Search form shortcode not rendered: {}", e);
            return MISSING_FORM_ID_MESSAGE.to_string();
        }
    };
    let token = issuer.issue(&identity.action(), now);
    render(&CUSTOMIZABLE_FIELDS, identity, current_term, &token, action_url)
}

/// Render `[trend_alert_search_form]` / 渲染趋势提醒搜索表单
pub fn render_trend_alert_form(current_term: &str, issuer: &NonceIssuer, action_url: &str, now: i64) -> String {
    let identity = FormIdentity::TrendAlert;
    let token = issuer.issue(&identity.action(), now);
    render(&TREND_ALERT_FIELDS, identity, current_term, &token, action_url)
}
