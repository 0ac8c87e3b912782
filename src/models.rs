use serde::{Deserialize, Serialize};
use std::fmt;

/// Content type identifier (e.g. `post`, `page`, `trend-alert`) / 内容类型标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Registry entry for a content type / 内容类型注册信息
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentTypeInfo {
    pub name: String,
    pub label: String,
    pub public: bool,
}

/// Search form record / 搜索表单
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchForm {
    pub id: i64,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SearchForm {
    /// Shortcode text an editor pastes into a page / 可复制的短代码
    pub fn shortcode(&self) -> String {
        crate::shortcode::search_form_shortcode(self.id)
    }
}

/// Search form with its selected content types / 含内容类型的搜索表单
#[derive(Debug, Clone, Serialize)]
pub struct SearchFormDetail {
    #[serde(flatten)]
    pub form: SearchForm,
    pub post_types: Vec<ContentType>,
    pub shortcode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSearchFormRequest {
    pub title: String,
    #[serde(default)]
    pub post_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSearchFormRequest {
    pub title: Option<String>,
    /// `None` clears the stored selection / 为空时清除已保存的选择
    pub post_types: Option<Vec<String>>,
}

/// Host content record returned by searches / 搜索结果记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub post_type: String,
    pub post_status: String,
    pub created_at: String,
}
