//! Server mode
//!
//! Wires storage, lookup and retention into an actix-web server and runs
//! it until Ctrl+C.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::api_routes;
use crate::api::middleware::{OptionsResponder, RequestIdMiddleware};
use crate::api::services::not_found;
use crate::config::{AppConfig, CorsConfig};
use crate::runtime::lifetime;

/// 请求体上限
const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.enabled && cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 关闭时使用浏览器默认的同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default();

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin().send_wildcard();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    let methods: Vec<actix_web::http::Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.to_uppercase().parse().ok())
        .collect();
    if !methods.is_empty() {
        cors = cors.allowed_methods(methods);
    }

    for header in &cors_config.allowed_headers {
        cors = cors.allowed_header(header.as_str());
    }

    cors.max_age(cors_config.max_age)
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: AppConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let store = startup.store.clone();
    let check_service = startup.check_service.clone();
    let retention = startup.retention.clone();

    if config.retention.enabled {
        startup.retention.clone().spawn_background_task();
    } else {
        warn!("Retention background task disabled");
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let api_prefix = config.server.api_prefix.clone();
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        // 最后 wrap 的在最外层：CORS 给 OPTIONS 的短路响应补头，request id 覆盖两者
        App::new()
            .wrap(OptionsResponder)
            .wrap(build_cors_middleware(&cors_config))
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(check_service.clone()))
            .app_data(web::Data::new(retention.clone()))
            .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
            .service(api_routes(&api_prefix))
            .default_service(web::to(not_found))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
