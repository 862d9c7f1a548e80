use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;
use tracing::{error, info, trace};

use super::responses::json_response;
use crate::storage::IpRecordStore;
use crate::utils::now_timestamp;

pub const SERVICE_NAME: &str = "IP Checker API";

/// 存储探测超时
const STORE_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct HealthyBody {
    status: &'static str,
    service: &'static str,
    timestamp: String,
    database: &'static str,
    total_ips_checked: u64,
}

#[derive(Debug, Serialize)]
struct UnhealthyBody {
    status: &'static str,
    service: &'static str,
    timestamp: String,
    error: String,
}

/// Health Service
///
/// 直接查询 store 的记录数，不经过检查流程。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(store: web::Data<Arc<dyn IpRecordStore>>) -> HttpResponse {
        let start_time = Instant::now();
        trace!("Received health check request");

        let result = match tokio::time::timeout(STORE_PROBE_TIMEOUT, store.count_all()).await {
            Ok(Ok(count)) => Ok(count),
            Ok(Err(e)) => Err(e.message().to_string()),
            Err(_) => Err("Database health check timed out".to_string()),
        };

        match result {
            Ok(count) => {
                info!(
                    "Health check completed in {:?}, {} addresses recorded",
                    start_time.elapsed(),
                    count
                );
                json_response(
                    StatusCode::OK,
                    &HealthyBody {
                        status: "OK",
                        service: SERVICE_NAME,
                        timestamp: now_timestamp(),
                        database: "Connected",
                        total_ips_checked: count,
                    },
                )
            }
            Err(message) => {
                error!("Health check failed: {}", message);
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &UnhealthyBody {
                        status: "ERROR",
                        service: SERVICE_NAME,
                        timestamp: now_timestamp(),
                        error: message,
                    },
                )
            }
        }
    }
}
