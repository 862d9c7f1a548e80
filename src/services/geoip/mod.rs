//! GeoIP 服务模块
//!
//! 提供 IP 地址地理位置查询功能，默认通过外部 API (ip-api.com)。

mod external_api;
mod provider;

pub use external_api::ExternalApiProvider;
pub use provider::{
    GeoDetails, GeoLookup, LookupError, UNKNOWN, UNKNOWN_UPSTREAM_ERROR, parse_lookup_response,
};
