use serde::{Deserialize, Serialize};

use crate::errors::{IpCheckerError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 保留期上限（100 年）
pub const MAX_RETENTION_DAYS: u64 = 36_500;

/// 清理间隔上限（1 年）
pub const MAX_INTERVAL_HOURS: u64 = 24 * 365;

/// 应用配置（从 TOML + 环境变量加载，启动时构建一次）
///
/// 不做全局单例：启动时加载后按需传给各组件的构造函数。
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：IPC，分隔符：__
    /// 示例：IPC__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let explicit = path != DEFAULT_CONFIG_PATH;

        let settings = Config::builder()
            // 显式指定的文件必须存在，默认文件可选
            .add_source(File::with_name(path).required(explicit))
            .add_source(
                Environment::with_prefix("IPC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| IpCheckerError::config(format!("Failed to build config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| IpCheckerError::config(format!("Failed to deserialize config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the service misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(IpCheckerError::config("server.port must be non-zero"));
        }
        if self.database.database_url.trim().is_empty() {
            return Err(IpCheckerError::config("database.database_url is empty"));
        }
        if self.lookup.api_url.trim().is_empty() {
            return Err(IpCheckerError::config("lookup.api_url is empty"));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(IpCheckerError::config("lookup.timeout_secs must be > 0"));
        }
        if !(1..=MAX_RETENTION_DAYS).contains(&self.retention.max_age_days) {
            return Err(IpCheckerError::config(format!(
                "retention.max_age_days must be between 1 and {}",
                MAX_RETENTION_DAYS
            )));
        }
        if !(1..=MAX_INTERVAL_HOURS).contains(&self.retention.interval_hours) {
            return Err(IpCheckerError::config(format!(
                "retention.interval_hours must be between 1 and {}",
                MAX_INTERVAL_HOURS
            )));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(IpCheckerError::config(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
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

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// Prefix for every route, e.g. "/api". Empty mounts at the root.
    #[serde(default)]
    pub api_prefix: String,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// 连接超时（秒）
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
}

/// 外部地理位置查询服务配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupConfig {
    /// Base URL; the address is appended, or substituted for `{ip}` if present
    #[serde(default = "default_lookup_api_url")]
    pub api_url: String,
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

/// 过期记录清理配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetentionConfig {
    /// 是否启动后台定时清理
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,
    #[serde(default = "default_retention_max_age_days")]
    pub max_age_days: u64,
    #[serde(default = "default_retention_interval_hours")]
    pub interval_hours: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cors_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_allowed_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_cors_allowed_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://ip_checker.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    8
}

fn default_lookup_api_url() -> String {
    "http://ip-api.com/json/".to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_retention_enabled() -> bool {
    true
}

fn default_retention_max_age_days() -> u64 {
    30
}

fn default_retention_interval_hours() -> u64 {
    24
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_allowed_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
}

fn default_cors_allowed_headers() -> Vec<String> {
    vec!["Content-Type".to_string()]
}

fn default_cors_max_age() -> usize {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            api_prefix: String::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_url: default_lookup_api_url(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            max_age_days: default_retention_max_age_days(),
            interval_hours: default_retention_interval_hours(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_cors_allowed_origins(),
            allowed_methods: default_cors_allowed_methods(),
            allowed_headers: default_cors_allowed_headers(),
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
