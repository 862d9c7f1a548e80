//! GeoIP 查询抽象层
//!
//! 统一的查询接口和返回格式。上游可能缺省任意字段（取决于查询质量），
//! 所以这里把所有字段规范化：字符串缺省为 "Unknown"，经纬度缺省为 0。

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::errors::IpCheckerError;

/// 缺省字段占位值
pub const UNKNOWN: &str = "Unknown";

/// Fallback when the upstream reports failure without a message
pub const UNKNOWN_UPSTREAM_ERROR: &str = "Unknown error from IP service";

/// 规范化后的地理位置/网络信息
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoDetails {
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub isp: String,
    pub org: String,
    #[serde(rename = "as")]
    pub as_name: String,
}

impl Default for GeoDetails {
    fn default() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            country_code: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            region_name: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            zip: UNKNOWN.to_string(),
            lat: 0.0,
            lon: 0.0,
            timezone: UNKNOWN.to_string(),
            isp: UNKNOWN.to_string(),
            org: UNKNOWN.to_string(),
            as_name: UNKNOWN.to_string(),
        }
    }
}

/// 查询失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Timeout or transport failure; says nothing about the address itself
    Unavailable(String),
    /// Body was not a JSON object
    MalformedResponse(String),
    /// Upstream answered with a non-success status; carries its message
    Rejected(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Unavailable(_) => {
                write!(f, "Failed to fetch IP details from external service")
            }
            LookupError::MalformedResponse(_) => write!(f, "Invalid response from IP service"),
            LookupError::Rejected(msg) => write!(f, "IP service error: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<LookupError> for IpCheckerError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Rejected(_) => IpCheckerError::upstream_rejected(err.to_string()),
            LookupError::Unavailable(_) | LookupError::MalformedResponse(_) => {
                IpCheckerError::upstream_unavailable(err.to_string())
            }
        }
    }
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// 查询单个地址，单次尝试，不重试
    async fn lookup(&self, address: &str) -> Result<GeoDetails, LookupError>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

fn text_field(json: &Value, key: &str) -> String {
    match &json[key] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn coord_field(json: &Value, key: &str) -> f64 {
    match &json[key] {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// 解析 ip-api.com 格式的响应
///
/// 成功: `{"status": "success", "country": "...", ...}`
/// 失败: `{"status": "fail", "message": "private range", ...}`
pub fn parse_lookup_response(json: &Value) -> Result<GeoDetails, LookupError> {
    if !json.is_object() {
        return Err(LookupError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json
        )));
    }

    if json["status"].as_str() != Some("success") {
        let message = json["message"]
            .as_str()
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_UPSTREAM_ERROR);
        return Err(LookupError::Rejected(message.to_string()));
    }

    Ok(GeoDetails {
        country: text_field(json, "country"),
        country_code: text_field(json, "countryCode"),
        region: text_field(json, "region"),
        region_name: text_field(json, "regionName"),
        city: text_field(json, "city"),
        zip: text_field(json, "zip"),
        lat: coord_field(json, "lat"),
        lon: coord_field(json, "lon"),
        timezone: text_field(json, "timezone"),
        isp: text_field(json, "isp"),
        org: text_field(json, "org"),
        as_name: text_field(json, "as"),
    })
}
