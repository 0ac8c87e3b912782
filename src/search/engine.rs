//! Query engine - executes predicates against the content table / 查询引擎
//!
//! Page size is fixed; callers only choose the page number.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::ContentRecord;
use super::predicate::SearchPredicate;

/// Results per page / 每页结果数
pub const RESULTS_PER_PAGE: u32 = 10;

/// One page of results / 一页搜索结果
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub records: Vec<ContentRecord>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl SearchPage {
    pub fn empty(page: u32) -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            page,
            per_page: RESULTS_PER_PAGE,
            total_pages: 0,
        }
    }
}

#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Run `predicate`, returning page `page` (1-based) / 执行查询，页码从1开始
    async fn execute(&self, predicate: &SearchPredicate, page: u32) -> Result<SearchPage>;
}

#[derive(Clone)]
pub struct SqliteQueryEngine {
    db: SqlitePool,
}

impl SqliteQueryEngine {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QueryEngine for SqliteQueryEngine {
    async fn execute(&self, predicate: &SearchPredicate, page: u32) -> Result<SearchPage> {
        let page = page.max(1);
        let clause = predicate.where_clause();

        let count_sql = format!("SELECT COUNT(*) FROM posts WHERE {}", clause.sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in &clause.params {
            count_query = count_query.bind(param);
        }
        let total = count_query.fetch_one(&self.db).await?;

        if total == 0 {
            return Ok(SearchPage::empty(page));
        }

        let select_sql = format!(
            "SELECT id, title, content, post_type, post_status, created_at FROM posts WHERE {} \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            clause.sql
        );
        let mut select_query = sqlx::query_as::<_, ContentRecord>(&select_sql);
        for param in &clause.params {
            select_query = select_query.bind(param);
        }
        let offset = i64::from(page - 1) * i64::from(RESULTS_PER_PAGE);
        let records = select_query
            .bind(i64::from(RESULTS_PER_PAGE))
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        let total_pages = ((total + i64::from(RESULTS_PER_PAGE) - 1) / i64::from(RESULTS_PER_PAGE)) as u32;

        tracing::debug!(
            "Search executed: {} match(es), page {}/{}",
            total,
            page,
            total_pages
        );

        Ok(SearchPage {
            records,
            total,
            page,
            per_page: RESULTS_PER_PAGE,
            total_pages,
        })
    }
}

#[cfg(test)]
pub(crate) async fn insert_post(db: &SqlitePool, post_type: &str, status: &str, title: &str, content: &str) -> i64 {
    let result = sqlx::query(
        "INSERT INTO posts (title, content, post_type, post_status, created_at) VALUES (?, ?, ?, ?, ?)"
    )
    .bind(title)
    .bind(content)
    .bind(post_type)
    .bind(status)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(db)
    .await
    .unwrap();
    result.last_insert_rowid()
}
