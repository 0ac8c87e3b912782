//! Scope selection submissions / 内容类型选择的提交处理
//!
//! Every submitted value is checked against the public registry before it is
//! stored. Unknown values are dropped silently.

use crate::error::{Result, SearchError};
use crate::models::{ContentType, ContentTypeInfo};
use crate::store::{ContentTypeRegistry, FormStore, SettingsStore};
use crate::utils::sanitize_text_field;

/// Check one submitted value against the registry / 校验单个提交值
///
/// The trimmed raw value must equal a registered public name; it is only
/// sanitized afterwards.
pub fn validate_content_type(raw: &str, registry: &[ContentTypeInfo]) -> Result<ContentType> {
    let raw = raw.trim();
    if registry.iter().any(|t| t.public && t.name == raw) {
        Ok(ContentType::new(sanitize_text_field(raw)))
    } else {
        Err(SearchError::InvalidScopeSubmission(sanitize_text_field(raw)))
    }
}

/// Keep registered public types only, deduplicated in submission order
/// 只保留已注册的公开类型，按提交顺序去重
pub fn sanitize_scope_submission(input: &[String], registry: &[ContentTypeInfo]) -> Vec<ContentType> {
    let mut sanitized: Vec<ContentType> = Vec::with_capacity(input.len());
    for raw in input {
        match validate_content_type(raw, registry) {
            Ok(content_type) => {
                if !sanitized.contains(&content_type) {
                    sanitized.push(content_type);
                }
            }
            Err(e) => tracing::debug!("Dropping scope entry: {}", e),
        }
    }
    sanitized
}

/// Sanitize and store the global default scope / 清理并保存全局默认范围
pub async fn save_global_scope<S>(store: &S, input: &[String]) -> Result<Vec<ContentType>>
where
    S: SettingsStore + ContentTypeRegistry + ?Sized,
{
    let registry = store.list_public_content_types().await?;
    let sanitized = sanitize_scope_submission(input, &registry);
    store.set_global_scope(&sanitized).await?;
    tracing::info!("Global search scope updated: {} content type(s)", sanitized.len());
    Ok(sanitized)
}

/// Sanitize and store a form's scope, `None` clears it / 清理并保存表单范围，None 表示清除
pub async fn save_form_scope<S>(store: &S, form_id: i64, input: Option<&[String]>) -> Result<Vec<ContentType>>
where
    S: FormStore + ContentTypeRegistry + ?Sized,
{
    if store.get_form(form_id).await?.is_none() {
        return Err(SearchError::FormNotFound(form_id));
    }
    let sanitized = match input {
        Some(input) => {
            let registry = store.list_public_content_types().await?;
            sanitize_scope_submission(input, &registry)
        }
        None => Vec::new(),
    };
    store.set_form_scope(form_id, &sanitized).await?;
    tracing::info!("Search form {} scope updated: {} content type(s)", form_id, sanitized.len());
    Ok(sanitized)
}
