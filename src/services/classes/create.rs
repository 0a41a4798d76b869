use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{CLASS_NAME_MAX_CHARS, ClassService};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::current_user;
use crate::utils::validate::validate_title;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    class_data.name = match validate_title(&class_data.name, CLASS_NAME_MAX_CHARS) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ClassCreationFailed, msg)));
        }
    };
    class_data.description = class_data
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    // 创建者即负责教师，访问码由存储层生成
    match storage.create_class(user.id, class_data).await {
        Ok(class) => {
            info!(
                "Class {} ({}) created by {}",
                class.name, class.access_code, user.username
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) => {
            error!("Class creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ClassCreationFailed,
                    format!("Class creation failed: {}", e.message()),
                )),
            )
        }
    }
}
