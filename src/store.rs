//! Persistent settings, search forms and the content-type registry / 设置、搜索表单与内容类型注册表
//!
//! The search pipeline only talks to these traits; [`SqliteStore`] backs all
//! three with the main database.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Result, SearchError};
use crate::models::{ContentType, ContentTypeInfo, SearchForm};

const GLOBAL_SCOPE_KEY: &str = "post_types";

/// Global default scope storage / 全局默认范围存储
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_global_scope(&self) -> Result<Vec<ContentType>>;
    async fn set_global_scope(&self, scope: &[ContentType]) -> Result<()>;
}

/// Search forms and their per-form scopes / 搜索表单及其范围
#[async_trait]
pub trait FormStore: Send + Sync {
    async fn list_forms(&self) -> Result<Vec<SearchForm>>;
    async fn get_form(&self, id: i64) -> Result<Option<SearchForm>>;
    async fn create_form(&self, title: &str) -> Result<SearchForm>;
    async fn rename_form(&self, id: i64, title: &str) -> Result<SearchForm>;
    /// Returns false when the form did not exist / 表单不存在时返回 false
    async fn delete_form(&self, id: i64) -> Result<bool>;
    async fn get_form_scope(&self, id: i64) -> Result<Vec<ContentType>>;
    async fn set_form_scope(&self, id: i64, scope: &[ContentType]) -> Result<()>;
}

/// Public content-type registry / 公开内容类型注册表
#[async_trait]
pub trait ContentTypeRegistry: Send + Sync {
    /// Public content types ordered by name / 按名称排序的公开内容类型
    async fn list_public_content_types(&self) -> Result<Vec<ContentTypeInfo>>;
}

#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsStore for SqliteStore {
    async fn get_global_scope(&self) -> Result<Vec<ContentType>> {
        let value: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM search_settings WHERE key = ?"
        )
        .bind(GLOBAL_SCOPE_KEY)
        .fetch_optional(&self.db)
        .await?;

        // Unreadable values count as "nothing selected" / 无法解析时视为未选择
        Ok(value
            .and_then(|(v,)| serde_json::from_str::<Vec<ContentType>>(&v).ok())
            .unwrap_or_default())
    }

    async fn set_global_scope(&self, scope: &[ContentType]) -> Result<()> {
        let value = serde_json::to_string(scope).unwrap_or_else(|_| "[]".to_string());
        sqlx::query(
            "INSERT OR REPLACE INTO search_settings (key, value, updated_at) VALUES (?, ?, ?)"
        )
        .bind(GLOBAL_SCOPE_KEY)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl FormStore for SqliteStore {
    async fn list_forms(&self) -> Result<Vec<SearchForm>> {
        let forms = sqlx::query_as::<_, SearchForm>(
            "SELECT id, title, created_at, updated_at FROM search_forms ORDER BY id DESC"
        )
        .fetch_all(&self.db)
        .await?;
        Ok(forms)
    }

    async fn get_form(&self, id: i64) -> Result<Option<SearchForm>> {
        let form = sqlx::query_as::<_, SearchForm>(
            "SELECT id, title, created_at, updated_at FROM search_forms WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(form)
    }

    async fn create_form(&self, title: &str) -> Result<SearchForm> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO search_forms (title, created_at, updated_at) VALUES (?, ?, ?)"
        )
        .bind(title)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        Ok(SearchForm {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn rename_form(&self, id: i64, title: &str) -> Result<SearchForm> {
        let result = sqlx::query(
            "UPDATE search_forms SET title = ?, updated_at = ? WHERE id = ?"
        )
        .bind(title)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SearchError::FormNotFound(id));
        }
        self.get_form(id).await?.ok_or(SearchError::FormNotFound(id))
    }

    async fn delete_form(&self, id: i64) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM search_form_post_types WHERE form_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM search_forms WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_form_scope(&self, id: i64) -> Result<Vec<ContentType>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT post_type FROM search_form_post_types WHERE form_id = ? ORDER BY position ASC"
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|(t,)| ContentType::new(t)).collect())
    }

    async fn set_form_scope(&self, id: i64, scope: &[ContentType]) -> Result<()> {
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM search_form_post_types WHERE form_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for (position, content_type) in scope.iter().enumerate() {
            sqlx::query(
                "INSERT OR IGNORE INTO search_form_post_types (form_id, position, post_type) VALUES (?, ?, ?)"
            )
            .bind(id)
            .bind(position as i64)
            .bind(content_type.as_str())
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query("UPDATE search_forms SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ContentTypeRegistry for SqliteStore {
    async fn list_public_content_types(&self) -> Result<Vec<ContentTypeInfo>> {
        let types = sqlx::query_as::<_, ContentTypeInfo>(
            "SELECT name, label, public FROM content_types WHERE public = 1 ORDER BY name ASC"
        )
        .fetch_all(&self.db)
        .await?;
        Ok(types)
    }
}
