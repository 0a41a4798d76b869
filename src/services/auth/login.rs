use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 根据用户名或邮箱获取用户信息，邮箱按小写保存
    let identifier = login_request.username.trim();
    let identifier = if identifier.contains('@') {
        identifier.to_lowercase()
    } else {
        identifier.to_string()
    };

    let user = match storage.get_user_by_username_or_email(&identifier).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("Login failed for unknown user {}", login_request.username);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        tracing::info!("Login failed for user {}: wrong password", user.username);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Username or password is incorrect",
        )));
    }

    if !user.is_active() {
        tracing::info!("Login refused for suspended user {}", user.username);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Account is suspended",
        )));
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.id, e);
    }

    // 4. 生成令牌对
    let token_pair = match JwtUtils::generate_token_pair(
        user.id,
        &user.role.to_string(),
        login_request.remember_me,
    ) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    tracing::info!("User {} logged in successfully", user.username);

    // 5. refresh token 写入 HttpOnly Cookie
    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, login_request.remember_me);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_ttl().num_seconds(),
        user,
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
