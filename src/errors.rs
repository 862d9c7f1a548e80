use std::fmt;

#[derive(Debug, Clone)]
pub enum IpCheckerError {
    InvalidInput(String),
    UpstreamUnavailable(String),
    UpstreamRejected(String),
    StoreUnavailable(String),
    DatabaseConfig(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
}

impl IpCheckerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            IpCheckerError::InvalidInput(_) => "E001",
            IpCheckerError::UpstreamUnavailable(_) => "E002",
            IpCheckerError::UpstreamRejected(_) => "E003",
            IpCheckerError::StoreUnavailable(_) => "E004",
            IpCheckerError::DatabaseConfig(_) => "E005",
            IpCheckerError::Config(_) => "E006",
            IpCheckerError::FileOperation(_) => "E007",
            IpCheckerError::Serialization(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            IpCheckerError::InvalidInput(_) => "Invalid Input",
            IpCheckerError::UpstreamUnavailable(_) => "Lookup Service Unavailable",
            IpCheckerError::UpstreamRejected(_) => "Lookup Service Error",
            IpCheckerError::StoreUnavailable(_) => "Store Unavailable",
            IpCheckerError::DatabaseConfig(_) => "Database Configuration Error",
            IpCheckerError::Config(_) => "Configuration Error",
            IpCheckerError::FileOperation(_) => "File Operation Error",
            IpCheckerError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            IpCheckerError::InvalidInput(msg) => msg,
            IpCheckerError::UpstreamUnavailable(msg) => msg,
            IpCheckerError::UpstreamRejected(msg) => msg,
            IpCheckerError::StoreUnavailable(msg) => msg,
            IpCheckerError::DatabaseConfig(msg) => msg,
            IpCheckerError::Config(msg) => msg,
            IpCheckerError::FileOperation(msg) => msg,
            IpCheckerError::Serialization(msg) => msg,
        }
    }

    /// Whether the failure originated outside this process (lookup service)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            IpCheckerError::UpstreamUnavailable(_) | IpCheckerError::UpstreamRejected(_)
        )
    }

    /// 格式化为彩色输出（用于启动失败和 CLI）
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

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for IpCheckerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for IpCheckerError {}

// 便捷的构造函数
impl IpCheckerError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::InvalidInput(msg.into())
    }

    pub fn upstream_unavailable<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::UpstreamUnavailable(msg.into())
    }

    pub fn upstream_rejected<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::UpstreamRejected(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::StoreUnavailable(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::DatabaseConfig(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        IpCheckerError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for IpCheckerError {
    fn from(err: sea_orm::DbErr) -> Self {
        IpCheckerError::StoreUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for IpCheckerError {
    fn from(err: std::io::Error) -> Self {
        IpCheckerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for IpCheckerError {
    fn from(err: serde_json::Error) -> Self {
        IpCheckerError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for IpCheckerError {
    fn from(err: toml::ser::Error) -> Self {
        IpCheckerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IpCheckerError>;
