use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PA";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - fixtures: 生成数据的规模和随机种子
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub fixtures: FixturesConfig,
}

impl StaticConfig {
    /// 宽松加载：从默认路径和环境变量加载，解析失败时打印错误并回退到默认配置
    ///
    /// 仅用于未经 `init_config_from` 初始化时的兜底。
    pub fn load() -> Self {
        Self::try_load_from(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            eprintln!("[ERROR] {}", e);
            Self::default()
        })
    }

    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值
    /// ENV 前缀：PA，分隔符：__
    /// 示例：PA__DATABASE__DATABASE_URL=sqlite://analytics.db
    ///
    /// 文件不存在时只使用 ENV 和默认值；文件存在但无法解析时返回 Err。
    pub fn try_load_from(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<StaticConfig>()?)
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 生成数据配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// 生成多少天的数据
    #[serde(default = "default_days_of_data")]
    pub days_of_data: u32,
    /// 噪声随机种子，相同种子生成相同序列
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    /// 测试 realm 的 string_id，每次运行会先删除同名 realm
    #[serde(default = "default_realm_string_id")]
    pub realm_string_id: String,
    /// 单条 INSERT 最多携带的行数
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_database_url() -> String {
    "sqlite://analytics.db".to_string()
}

fn default_database_pool_size() -> u32 {
    5
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_days_of_data() -> u32 {
    100
}

fn default_random_seed() -> u64 {
    crate::analytics::fixtures::DEFAULT_RANDOM_SEED
}

fn default_realm_string_id() -> String {
    "analytics".to_string()
}

fn default_insert_batch_size() -> usize {
    500
}

// ============================================================
// Default implementations
// ============================================================

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            days_of_data: default_days_of_data(),
            random_seed: default_random_seed(),
            realm_string_id: default_realm_string_id(),
            insert_batch_size: default_insert_batch_size(),
        }
    }
}
