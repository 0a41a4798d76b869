use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, not_found, require_class_manager, storage_failure};
use crate::services::files::remove_stored_files;

pub async fn delete_class(
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

    // 课程、附件记录、成员关系随外键级联删除，磁盘文件需要先记下
    let mut files = Vec::new();
    match storage.list_courses_by_class(class_id).await {
        Ok(courses) => {
            for course in courses {
                match storage.list_course_files(course.id).await {
                    Ok(course_files) => files.extend(course_files),
                    Err(e) => return Ok(storage_failure("Failed to list course files", e)),
                }
            }
        }
        Err(e) => return Ok(storage_failure("Failed to list class courses", e)),
    }

    match storage.delete_class(class_id).await {
        Ok(true) => {
            remove_stored_files(&files);
            info!("Class {} deleted by {}", class_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_failure("Failed to delete class", e)),
    }
}
