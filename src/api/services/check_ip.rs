use std::sync::Arc;

use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, trace};

use super::responses::{error_response, json_response};
use crate::services::{CheckOutcome, GeoDetails, IpCheckService};
use crate::utils::format_timestamp;

#[derive(Debug, Serialize)]
struct CheckedBody<'a> {
    duplicate: bool,
    ip: &'a str,
    #[serde(flatten)]
    details: &'a GeoDetails,
}

#[derive(Debug, Serialize)]
struct DuplicateBody {
    duplicate: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_checked: Option<String>,
}

/// Pull `ip` out of the request body.
///
/// A missing or null field reads as empty; any other non-string value is
/// passed on as text so it fails validation instead of the JSON parse.
fn extract_ip(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let ip = match value.get("ip") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    Some(ip)
}

pub struct CheckIpService;

impl CheckIpService {
    pub async fn check_ip(
        body: web::Bytes,
        service: web::Data<Arc<IpCheckService>>,
    ) -> HttpResponse {
        trace!("Received check-ip request ({} bytes)", body.len());

        let Some(raw_ip) = extract_ip(&body) else {
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON in request body");
        };

        match service.check_ip(&raw_ip).await {
            Ok(CheckOutcome::Rejected(reason)) => {
                error_response(StatusCode::BAD_REQUEST, reason.message())
            }
            Ok(CheckOutcome::Duplicate(info)) => json_response(
                StatusCode::OK,
                &DuplicateBody {
                    duplicate: true,
                    message: info.message(),
                    first_checked: info.first_checked.as_ref().map(format_timestamp),
                },
            ),
            Ok(CheckOutcome::Checked(checked)) => json_response(
                StatusCode::OK,
                &CheckedBody {
                    duplicate: false,
                    ip: &checked.address,
                    details: &checked.details,
                },
            ),
            Err(e) => {
                error!("IP check failed: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, e.message())
            }
        }
    }
}
