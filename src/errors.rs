use std::fmt;

#[derive(Debug, Clone)]
pub enum AnalyticsError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
}

impl AnalyticsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AnalyticsError::Config(_) => "E001",
            AnalyticsError::DatabaseConfig(_) => "E002",
            AnalyticsError::DatabaseConnection(_) => "E003",
            AnalyticsError::DatabaseOperation(_) => "E004",
            AnalyticsError::FileOperation(_) => "E005",
            AnalyticsError::Validation(_) => "E006",
            AnalyticsError::NotFound(_) => "E007",
            AnalyticsError::Serialization(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AnalyticsError::Config(_) => "Configuration Error",
            AnalyticsError::DatabaseConfig(_) => "Database Configuration Error",
            AnalyticsError::DatabaseConnection(_) => "Database Connection Error",
            AnalyticsError::DatabaseOperation(_) => "Database Operation Error",
            AnalyticsError::FileOperation(_) => "File Operation Error",
            AnalyticsError::Validation(_) => "Validation Error",
            AnalyticsError::NotFound(_) => "Resource Not Found",
            AnalyticsError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AnalyticsError::Config(msg)
            | AnalyticsError::DatabaseConfig(msg)
            | AnalyticsError::DatabaseConnection(msg)
            | AnalyticsError::DatabaseOperation(msg)
            | AnalyticsError::FileOperation(msg)
            | AnalyticsError::Validation(msg)
            | AnalyticsError::NotFound(msg)
            | AnalyticsError::Serialization(msg) => msg,
        }
    }

    /// 格式化为彩色输出（终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（日志、非 TTY）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AnalyticsError {}

// 便捷的构造函数
impl AnalyticsError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AnalyticsError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for AnalyticsError {
    fn from(err: sea_orm::DbErr) -> Self {
        AnalyticsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AnalyticsError {
    fn from(err: std::io::Error) -> Self {
        AnalyticsError::FileOperation(err.to_string())
    }
}

impl From<toml::ser::Error> for AnalyticsError {
    fn from(err: toml::ser::Error) -> Self {
        AnalyticsError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AnalyticsError {
    fn from(err: config::ConfigError) -> Self {
        AnalyticsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
