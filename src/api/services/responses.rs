//! 通用 JSON 响应

use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// `{"error": true, "message": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Content-Type", JSON_CONTENT_TYPE))
        .json(body)
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    json_response(
        status,
        &ErrorBody {
            error: true,
            message: message.into(),
        },
    )
}

/// 405，提示允许的方法
pub fn method_not_allowed(allowed: &str) -> HttpResponse {
    let mut response = error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method not allowed. Use {}.", allowed),
    );
    if let Ok(value) = actix_web::http::header::HeaderValue::from_str(allowed) {
        response
            .headers_mut()
            .insert(actix_web::http::header::ALLOW, value);
    }
    response
}

pub async fn not_found() -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
