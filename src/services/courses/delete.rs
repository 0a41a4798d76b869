use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, not_found, require_course_owner, storage_failure};
use crate::services::files::remove_stored_files;

pub async fn delete_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_course_owner(&storage, &user, course_id).await {
        return Ok(resp);
    }

    // 附件记录随外键删除，磁盘文件需要先记下
    let files = match storage.list_course_files(course_id).await {
        Ok(files) => files,
        Err(e) => return Ok(storage_failure("Failed to list course files", e)),
    };

    match storage.delete_course(course_id).await {
        Ok(true) => {
            remove_stored_files(&files);
            info!("Course {} deleted by {}", course_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(storage_failure("Failed to delete course", e)),
    }
}
