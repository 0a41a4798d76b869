use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::classes::requests::JoinClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, storage_failure};
use crate::utils::random_code::normalize_access_code;

pub async fn join_class(
    service: &ClassService,
    request: &HttpRequest,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let code = normalize_access_code(&join_data.access_code);
    if code.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassAccessCodeInvalid,
            "Access code is required",
        )));
    }

    let class = match storage.get_class_by_access_code(&code).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            info!("User {} tried unknown access code", user.id);
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassAccessCodeInvalid,
                "No class matches this access code",
            )));
        }
        Err(e) => return Ok(storage_failure("Failed to look up access code", e)),
    };

    match storage.is_student_enrolled(class.id, user.id).await {
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyJoined,
                "You have already joined this class",
            )));
        }
        Ok(false) => {}
        Err(e) => return Ok(storage_failure("Failed to check class membership", e)),
    }

    match storage.join_class(class.id, user.id).await {
        Ok(()) => {
            info!("Student {} joined class {}", user.username, class.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Joined class successfully")))
        }
        Err(e) => Ok(storage_failure("Failed to join class", e)),
    }
}
