use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use anyhow::Result;
use chrono::Utc;

/// Content types registered on first startup / 首次启动时注册的内容类型
const DEFAULT_CONTENT_TYPES: &[(&str, &str, bool)] = &[
    ("post", "Posts", true),
    ("page", "Pages", true),
    ("trend-alert", "Trend Alerts", true),
    ("custom_search_form", "Search Forms", false),
];

/// Open the main database pool / 打开主数据库连接池
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;

    // 启用WAL模式，提高并发性能
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
    // 设置busy_timeout，避免锁超时
    sqlx::query("PRAGMA busy_timeout=5000").execute(&pool).await?;

    Ok(pool)
}

/// Run database migrations / 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Host content, read-only for search / 站点内容（搜索只读）
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            post_type TEXT NOT NULL,
            post_status TEXT NOT NULL DEFAULT 'publish',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_posts_type_status ON posts(post_type, post_status)"
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_types (
            name TEXT PRIMARY KEY,
            label TEXT NOT NULL,
            public INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_forms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_form_post_types (
            form_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            post_type TEXT NOT NULL,
            PRIMARY KEY(form_id, post_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    initialize_default_data(pool).await?;

    Ok(())
}

async fn initialize_default_data(pool: &SqlitePool) -> Result<()> {
    let type_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_types")
        .fetch_one(pool)
        .await?;

    if type_count == 0 {
        tracing::info!("First startup, registering default content types...");
        for &(name, label, public) in DEFAULT_CONTENT_TYPES {
            sqlx::query(
                "INSERT OR IGNORE INTO content_types (name, label, public) VALUES (?, ?, ?)"
            )
            .bind(name)
            .bind(label)
            .bind(public)
            .execute(pool)
            .await?;
        }
    }

    // Global selection starts empty / 全局选择初始为空
    sqlx::query(
        "INSERT OR IGNORE INTO search_settings (key, value, updated_at) VALUES ('post_types', '[]', ?)"
    )
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_types")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, DEFAULT_CONTENT_TYPES.len() as i64);

        let value: String = sqlx::query_scalar("SELECT value FROM search_settings WHERE key = 'post_types'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(value, "[]");
    }
}
