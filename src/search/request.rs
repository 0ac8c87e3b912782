//! Incoming search request / 搜索请求
//!
//! Query parameter names match the fields rendered by [`crate::shortcode`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{parse_positive_id, sanitize_text_field};

/// Marker value for the general (site-wide) search / 通用搜索标记值
pub const GENERAL_MARKER: &str = "general";

/// Which logical search a request acts for / 请求所属的搜索类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FormIdentity {
    General,
    Form(i64),
    TrendAlert,
}

impl FormIdentity {
    /// Parse the `customizable_search_active` marker / 解析表单标记
    pub fn parse_marker(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(GENERAL_MARKER) {
            return Some(Self::General);
        }
        parse_positive_id(raw).map(Self::Form)
    }

    /// Value written into the hidden marker field / 隐藏标记字段的值
    pub fn marker_value(&self) -> String {
        match self {
            Self::General => GENERAL_MARKER.to_string(),
            Self::Form(id) => id.to_string(),
            Self::TrendAlert => "1".to_string(),
        }
    }

    /// Logical action an anti-forgery token is bound to / 令牌绑定的动作
    pub fn action(&self) -> String {
        match self {
            Self::General => "customizable_search:general".to_string(),
            Self::Form(id) => format!("customizable_search:form:{}", id),
            Self::TrendAlert => "trend_alert_search".to_string(),
        }
    }
}

impl fmt::Display for FormIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => f.write_str("general"),
            Self::Form(id) => write!(f, "form#{}", id),
            Self::TrendAlert => f.write_str("trend-alert"),
        }
    }
}

/// What the request's marker parameter claims / 标记参数的声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// No plugin marker, plain host search / 无标记
    Absent,
    /// Marker present but not a usable identity / 标记无法解析
    Malformed,
    Claims(FormIdentity),
}

/// Raw query parameters / 原始查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Host search term / 站点默认搜索词
    #[serde(default)]
    pub s: Option<String>,
    #[serde(default)]
    pub custom_search_term: Option<String>,
    #[serde(default)]
    pub customizable_search_active: Option<String>,
    #[serde(default)]
    pub customizable_search_nonce: Option<String>,
    #[serde(default)]
    pub trend_alert_search: Option<String>,
    #[serde(default)]
    pub trend_alert_search_nonce: Option<String>,
    #[serde(default)]
    pub trend_alert_term: Option<String>,
    /// Raw page number; unusable values mean page 1 / 页码原始值，无效时为第1页
    #[serde(default)]
    pub paged: Option<String>,
}

/// Normalized search request, one per HTTP request / 规范化后的搜索请求
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub marker: Marker,
    pub token: Option<String>,
    /// Term typed into the plugin form / 插件表单中的搜索词
    pub term: String,
    /// Term for the default host search / 默认搜索词
    pub host_term: String,
    pub page: u32,
}

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SearchRequest {
    pub fn from_params(params: &SearchParams) -> Self {
        let host_term = params.s.as_deref().map(sanitize_text_field).unwrap_or_default();
        let page = parse_page(params.paged.as_deref());

        // Trend alert marker wins when both are present / 同时存在时优先趋势提醒
        if params.trend_alert_search.is_some() {
            return Self {
                marker: Marker::Claims(FormIdentity::TrendAlert),
                token: non_empty(&params.trend_alert_search_nonce),
                term: params.trend_alert_term.as_deref().map(sanitize_text_field).unwrap_or_default(),
                host_term,
                page,
            };
        }

        let marker = match params.customizable_search_active.as_deref() {
            None => Marker::Absent,
            Some(raw) => match FormIdentity::parse_marker(raw) {
                Some(identity) => Marker::Claims(identity),
                None => Marker::Malformed,
            },
        };

        Self {
            marker,
            token: non_empty(&params.customizable_search_nonce),
            term: params.custom_search_term.as_deref().map(sanitize_text_field).unwrap_or_default(),
            host_term,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marker() {
        assert_eq!(FormIdentity::parse_marker("general"), Some(FormIdentity::General));
        assert_eq!(FormIdentity::parse_marker("GENERAL"), Some(FormIdentity::General));
        assert_eq!(FormIdentity::parse_marker("7"), Some(FormIdentity::Form(7)));
        assert_eq!(FormIdentity::parse_marker("0"), None);
        assert_eq!(FormIdentity::parse_marker(""), None);
        assert_eq!(FormIdentity::parse_marker("x"), None);
    }

    #[test]
    fn test_actions_are_distinct() {
        let actions = [
            FormIdentity::General.action(),
            FormIdentity::Form(1).action(),
            FormIdentity::Form(2).action(),
            FormIdentity::TrendAlert.action(),
        ];
        for (i, a) in actions.iter().enumerate() {
            for b in actions.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_from_params_form_search() {
        let params = SearchParams {
            s: Some("search-trigger".into()),
            custom_search_term: Some("  sale ".into()),
            customizable_search_active: Some("4".into()),
            customizable_search_nonce: Some("abc".into()),
            paged: Some("2".into()),
            ..Default::default()
        };
        let req = SearchRequest::from_params(&params);
        assert_eq!(req.marker, Marker::Claims(FormIdentity::Form(4)));
        assert_eq!(req.token.as_deref(), Some("abc"));
        assert_eq!(req.term, "sale");
        assert_eq!(req.host_term, "search-trigger");
        assert_eq!(req.page, 2);
    }

    #[test]
    fn test_from_params_trend_alert_and_blank_token() {
        let params = SearchParams {
            trend_alert_search: Some("1".into()),
            trend_alert_search_nonce: Some("   ".into()),
            trend_alert_term: Some("Q3 report".into()),
            paged: Some("0".into()),
            ..Default::default()
        };
        let req = SearchRequest::from_params(&params);
        assert_eq!(req.marker, Marker::Claims(FormIdentity::TrendAlert));
        assert_eq!(req.token, None);
        assert_eq!(req.term, "Q3 report");
        assert_eq!(req.page, 1);
    }

    #[test]
    fn test_unusable_page_means_first_page() {
        for raw in ["abc", "-3", "0", "", "2.5", "99999999999"] {
            let req = SearchRequest::from_params(&SearchParams {
                paged: Some(raw.into()),
                ..Default::default()
            });
            assert_eq!(req.page, 1, "paged={:?}", raw);
        }
        assert_eq!(parse_page(Some(" 4 ")), 4);
        assert_eq!(parse_page(None), 1);
    }

    #[test]
    fn test_from_params_without_marker() {
        let req = SearchRequest::from_params(&SearchParams {
            s: Some("hello".into()),
            ..Default::default()
        });
        assert_eq!(req.marker, Marker::Absent);
        assert_eq!(req.host_term, "hello");

        let req = SearchRequest::from_params(&SearchParams {
            customizable_search_active: Some("nope".into()),
            ..Default::default()
        });
        assert_eq!(req.marker, Marker::Malformed);
    }
}
