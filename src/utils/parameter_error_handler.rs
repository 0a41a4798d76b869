//! JSON 与查询参数解析失败时返回统一响应

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String) -> actix_web::Error {
    let message = format!("Invalid {kind}: {detail}");
    tracing::info!("{}", message);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request("request body", err.to_string())
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request("query parameters", err.to_string())
}
