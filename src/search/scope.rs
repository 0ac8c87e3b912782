//! Content-type scope resolution / 内容类型范围解析

use serde::Serialize;
use std::collections::HashMap;

use crate::models::ContentType;
use super::FormIdentity;

/// Site's primary content type, used when nothing is selected / 未选择时的默认内容类型
pub const FALLBACK_CONTENT_TYPE: &str = "post";

/// The only content type the trend-alert search covers / 趋势提醒搜索的固定内容类型
pub const TREND_ALERT_CONTENT_TYPE: &str = "trend-alert";

/// Per-form scope selections keyed by form id / 各表单的内容类型选择
pub type PerFormScopes = HashMap<i64, Vec<ContentType>>;

/// Non-empty ordered set of content types / 非空有序内容类型集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentTypeScope(Vec<ContentType>);

impl ContentTypeScope {
    /// Build a scope, dropping duplicates; `None` if nothing remains / 去重构建，空则返回 None
    pub fn new<I>(types: I) -> Option<Self>
    where
        I: IntoIterator<Item = ContentType>,
    {
        let mut out: Vec<ContentType> = Vec::new();
        for t in types {
            if !t.as_str().is_empty() && !out.contains(&t) {
                out.push(t);
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(Self(out))
        }
    }

    pub fn single(content_type: impl Into<String>) -> Self {
        Self(vec![ContentType::new(content_type)])
    }

    pub fn fallback() -> Self {
        Self::single(FALLBACK_CONTENT_TYPE)
    }

    pub fn trend_alert() -> Self {
        Self::single(TREND_ALERT_CONTENT_TYPE)
    }

    pub fn as_slice(&self) -> &[ContentType] {
        &self.0
    }

    pub fn contains(&self, content_type: &str) -> bool {
        self.0.iter().any(|t| t.as_str() == content_type)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: constructors reject empty sets / 构造时已排除空集合
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolve the scope for a search / 解析搜索范围
///
/// A non-empty per-form selection always wins; the global default only applies
/// to the general search. The two sets are never merged.
pub fn resolve(identity: &FormIdentity, global_default: &[ContentType], per_form: &PerFormScopes) -> ContentTypeScope {
    match identity {
        FormIdentity::General => ContentTypeScope::new(global_default.iter().cloned())
            .unwrap_or_else(ContentTypeScope::fallback),
        FormIdentity::Form(id) => per_form
            .get(id)
            .and_then(|types| ContentTypeScope::new(types.iter().cloned()))
            .unwrap_or_else(ContentTypeScope::fallback),
        FormIdentity::TrendAlert => ContentTypeScope::trend_alert(),
    }
}
