//! SeaORM storage backend
//!
//! Connection setup and schema migrations for SQLite, MySQL/MariaDB
//! and PostgreSQL.

mod connection;
pub mod retry;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{AnalyticsError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(AnalyticsError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        other => other.to_string(),
    }
}

/// 按配置连接数据库并执行迁移
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let database_url = config.database_url.trim();
    if database_url.is_empty() {
        return Err(AnalyticsError::database_config("DATABASE_URL 未设置"));
    }

    let backend_name = normalize_backend_name(&infer_backend_from_url(database_url)?);
    let retry_config = retry::RetryConfig::from(config);

    let db = if backend_name == "sqlite" {
        connect_sqlite(database_url).await?
    } else {
        connect_generic(database_url, &backend_name, config, retry_config).await?
    };

    run_migrations(&db, retry_config).await?;

    info!("{} storage initialized", backend_name.to_uppercase());
    Ok(db)
}
