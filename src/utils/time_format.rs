use chrono::{DateTime, Utc};

/// 对外展示用的时间格式（UTC，无时区后缀）
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 格式化为 `YYYY-MM-DD HH:MM:SS`（UTC）
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// 当前时间，用于健康检查等响应
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}
