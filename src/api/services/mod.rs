pub mod check_ip;
pub mod cleanup;
pub mod health;
pub mod responses;

use actix_web::web;

pub use check_ip::CheckIpService;
pub use cleanup::CleanupService;
pub use health::HealthService;
pub use responses::{ErrorBody, method_not_allowed, not_found};

/// 规范化路由前缀：空或 "/" 表示挂在根路径，去掉末尾斜杠
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// API 路由配置
///
/// 未匹配的路径落到 App 的 default_service (404)；
/// OPTIONS 由 `OptionsResponder` 和 CORS 中间件处理。
pub fn api_routes(prefix: &str) -> actix_web::Scope {
    web::scope(&normalize_prefix(prefix))
        .service(
            web::resource("/check-ip")
                .route(web::post().to(CheckIpService::check_ip))
                .default_service(web::to(|| async { method_not_allowed("POST") })),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(HealthService::health_check))
                .default_service(web::to(|| async { method_not_allowed("GET") })),
        )
        .service(
            web::resource("/cleanup")
                .route(web::get().to(CleanupService::cleanup))
                .default_service(web::to(|| async { method_not_allowed("GET") })),
        )
}
