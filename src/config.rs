//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default anti-forgery token lifetime: one day / 默认令牌有效期：一天
pub const DEFAULT_NONCE_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// Database configuration / 数据库配置
    pub database: DatabaseConfig,
    /// Token and admin secrets / 令牌与管理密钥
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
    /// Path rendered forms submit to / 表单提交路径
    #[serde(default = "default_search_path")]
    pub search_path: String,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Main database file path (relative to data_dir) / 主数据库文件路径
    pub db_file: String,
}

/// Security configuration / 安全配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC key for anti-forgery tokens / 防伪令牌密钥
    #[serde(default)]
    pub nonce_secret: String,
    /// Token lifetime in seconds / 令牌有效期（秒）
    #[serde(default = "default_nonce_lifetime")]
    pub nonce_lifetime_secs: i64,
    /// Bearer token for admin endpoints / 管理接口令牌
    #[serde(default)]
    pub admin_token: String,
}

fn default_search_path() -> String { "/search".to_string() }
fn default_nonce_lifetime() -> i64 { DEFAULT_NONCE_LIFETIME_SECS }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
            search_path: default_search_path(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "scoped_search.db".to_string(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            nonce_secret: String::new(),
            nonce_lifetime_secs: DEFAULT_NONCE_LIFETIME_SECS,
            admin_token: String::new(),
        }
    }
}

/// Generate random alphanumeric secret / 生成随机密钥
fn generate_secret(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

impl AppConfig {
    /// Get the full database URL / 获取完整的数据库URL
    pub fn get_database_url(&self) -> String {
        let db_path = Path::new(&self.database.data_dir).join(&self.database.db_file);
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Get the full data directory path / 获取完整的数据目录路径
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Fill empty secrets with random values, returns true if anything changed
    /// 填充空密钥，有改动时返回 true
    pub fn ensure_secrets(&mut self) -> bool {
        let mut changed = false;
        if self.security.nonce_secret.is_empty() {
            self.security.nonce_secret = generate_secret(64);
            changed = true;
        }
        if self.security.admin_token.is_empty() {
            self.security.admin_token = generate_secret(32);
            changed = true;
        }
        if self.security.nonce_lifetime_secs <= 0 {
            self.security.nonce_lifetime_secs = DEFAULT_NONCE_LIFETIME_SECS;
            changed = true;
        }
        changed
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let mut config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        // Older files may lack secrets / 旧配置文件可能缺少密钥
        if config.ensure_secrets() {
            save_config(&config)?;
            tracing::info!("Generated missing secrets in {:?}", config_path);
        }

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let mut config = AppConfig::default();
        config.ensure_secrets();
        save_config(&config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        tracing::info!("Admin token written to config.json (security.admin_token)");
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path();

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
