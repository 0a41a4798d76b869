use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::auth::RegisterRequest;
use crate::models::users::{CreateUserRequest, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    // 1. 只能注册学生或教师
    if register_request.role == UserRole::Admin {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RegisterFailed,
            "Role must be student or teacher",
        )));
    }

    // 2. 验证用户名、邮箱、密码
    if let Err(msg) = validate_username(&username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Err(failures) = validate_password(&register_request.password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            failures.join("; "),
        )));
    }

    // 3. 检查用户名、邮箱是否已存在
    if let Err(response) = check_username_exists(&storage, &username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    // 4. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            );
        }
    };

    // 学校只对学生有意义
    let school_name = match register_request.role {
        UserRole::Student => register_request
            .school_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    };

    let create_request = CreateUserRequest {
        username,
        email,
        password_hash,
        role: register_request.role,
        display_name: register_request
            .display_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        school_name,
    };

    // 5. 创建用户
    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("Registered {} {}", user.role, user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Registration successful")))
        }
        Err(e) => {
            tracing::error!("Register failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            )
        }
    }
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}
