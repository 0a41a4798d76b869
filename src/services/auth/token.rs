use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::{RefreshTokenResponse, UserInfoResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;

pub async fn handle_refresh_token(request: &HttpRequest) -> ActixResult<HttpResponse> {
    // 从 cookie 中提取 refresh token
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    // 验证 refresh token 并生成新的 access token
    match JwtUtils::refresh_access_token(&refresh_token) {
        Ok(access_token) => {
            let response = RefreshTokenResponse {
                access_token,
                expires_in: JwtUtils::access_token_ttl().num_seconds(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);

            // 清除无效的 refresh token cookie
            let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

            Ok(HttpResponse::Unauthorized()
                .cookie(empty_cookie)
                .json(ApiResponse::error_empty(
                    ErrorCode::RefreshTokenInvalid,
                    "Login expired or invalid, please login again",
                )))
        }
    }
}

pub async fn handle_get_user(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))),
    }
}
