use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::classes::responses::ClassStudentListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, not_found, require_class_manager, storage_failure};

pub async fn list_students(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_class_manager(&storage, &user, class_id).await {
        return Ok(resp);
    }

    match storage.list_class_students(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassStudentListResponse { items },
            "Class students retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("Failed to list class students", e)),
    }
}

pub async fn remove_student(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_class_manager(&storage, &user, class_id).await {
        return Ok(resp);
    }

    // 作答记录保留，只解除班级关系
    match storage.remove_class_student(class_id, student_id).await {
        Ok(true) => {
            info!(
                "Student {} removed from class {} by {}",
                student_id, class_id, user.username
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student removed from class")))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::ClassStudentNotFound,
            "Student is not in this class",
        )),
        Err(e) => Ok(storage_failure("Failed to remove student", e)),
    }
}
