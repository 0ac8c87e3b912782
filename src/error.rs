//! Error types / 错误类型

use thiserror::Error;

/// Result alias for search operations / 搜索操作结果类型
pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Shortcode invoked without a usable form reference / 短代码缺少表单ID
    #[error("Search form ID is required")]
    MissingFormIdentity,

    /// Submitted content type is not in the public registry / 提交的内容类型未注册
    #[error("Content type '{0}' is not a registered public content type")]
    InvalidScopeSubmission(String),

    #[error("Search form {0} not found")]
    FormNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
