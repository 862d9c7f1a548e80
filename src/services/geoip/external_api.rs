//! 外部 GeoIP API 实现
//!
//! 使用外部 HTTP API 进行 IP 地理位置查询（默认 ip-api.com）。
//! 每次查询单次尝试，不缓存，不重试。

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::provider::{GeoDetails, GeoLookup, LookupError, parse_lookup_response};
use crate::config::LookupConfig;

/// URL 中的地址占位符
const IP_PLACEHOLDER: &str = "{ip}";

const USER_AGENT: &str = concat!("ip-checker/", env!("CARGO_PKG_VERSION"));

/// 外部 API GeoIP Provider
pub struct ExternalApiProvider {
    api_url: String,
    agent: Agent,
}

impl ExternalApiProvider {
    /// 创建外部 API Provider
    ///
    /// `api_url` 可以包含 `{ip}` 占位符，
    /// 例如 `http://ip-api.com/json/{ip}?fields=66846719`；
    /// 否则地址直接拼接在末尾。
    pub fn new(config: &LookupConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs.max(1))))
            .build()
            .into();

        Self {
            api_url: config.api_url.clone(),
            agent,
        }
    }

    pub fn build_url(&self, address: &str) -> String {
        if self.api_url.contains(IP_PLACEHOLDER) {
            self.api_url.replace(IP_PLACEHOLDER, address)
        } else {
            format!("{}{}", self.api_url, address)
        }
    }

    /// 同步查询（在 spawn_blocking 中调用）
    fn fetch_sync(agent: &Agent, url: &str) -> Result<GeoDetails, LookupError> {
        let resp = agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| {
                if matches!(e, ureq::Error::Timeout(_)) {
                    warn!("GeoIP API request to \"{}\" timed out", url);
                } else {
                    warn!("GeoIP API request to \"{}\" failed: {}", url, e);
                }
                LookupError::Unavailable(e.to_string())
            })?;

        let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
            warn!("GeoIP API response from \"{}\" parse failed: {}", url, e);
            LookupError::MalformedResponse(e.to_string())
        })?;

        trace!("GeoIP API raw response: {}", json);
        parse_lookup_response(&json)
    }
}

#[async_trait]
impl GeoLookup for ExternalApiProvider {
    async fn lookup(&self, address: &str) -> Result<GeoDetails, LookupError> {
        let url = self.build_url(address);
        let agent = self.agent.clone();
        debug!("Looking up {} via {}", address, url);

        // ureq 是同步客户端，放到阻塞线程池执行
        tokio::task::spawn_blocking(move || Self::fetch_sync(&agent, &url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP spawn_blocking failed: {}", e);
                Err(LookupError::Unavailable(e.to_string()))
            })
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}
