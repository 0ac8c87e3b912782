use serde::{Deserialize, Serialize};

use scoped_search::models::{ContentType, ContentTypeInfo};

/// Search settings update request / 搜索设置更新请求
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateSearchSettingsRequest {
    /// Content types searched by the general form / 通用表单搜索的内容类型
    #[serde(default)]
    pub post_types: Vec<String>,
}

/// Current search settings / 当前搜索设置
#[derive(Debug, Serialize)]
pub struct SearchSettingsResponse {
    pub post_types: Vec<ContentType>,
    /// Public types an administrator can pick from / 可选的公开内容类型
    pub available_post_types: Vec<ContentTypeInfo>,
}
