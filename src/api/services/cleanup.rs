use std::sync::Arc;

use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;
use tracing::{error, info};

use super::responses::json_response;
use crate::services::{CleanupReport, RetentionTask};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CleanupBody {
    success: bool,
    deleted_count: u64,
    remaining_count: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct CleanupErrorBody {
    success: bool,
    error: String,
}

pub fn cleanup_message(report: &CleanupReport) -> String {
    if report.deleted > 0 {
        format!("Cleanup completed: Deleted {} old records", report.deleted)
    } else {
        "No old records found to delete".to_string()
    }
}

pub struct CleanupService;

impl CleanupService {
    pub async fn cleanup(task: web::Data<Arc<RetentionTask>>) -> HttpResponse {
        info!("Manual cleanup requested");

        match task.run_cleanup().await {
            Ok(report) => json_response(
                StatusCode::OK,
                &CleanupBody {
                    success: true,
                    deleted_count: report.deleted,
                    remaining_count: report.remaining,
                    message: cleanup_message(&report),
                },
            ),
            Err(e) => {
                error!("Cleanup failed: {}", e);
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &CleanupErrorBody {
                        success: false,
                        error: e.message().to_string(),
                    },
                )
            }
        }
    }
}
