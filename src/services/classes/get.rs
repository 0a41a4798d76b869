use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::responses::ClassDetailResponse;
use crate::services::access::{current_user, require_class_member, storage_failure};

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (class, _) = match require_class_member(&storage, &user, class_id).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    let teacher_name = match storage.get_user_by_id(class.teacher_id).await {
        Ok(Some(teacher)) => teacher.name().to_string(),
        Ok(None) => String::new(),
        Err(e) => return Ok(storage_failure("Failed to load class teacher", e)),
    };

    let student_count = match storage.count_class_students(class_id).await {
        Ok(count) => count,
        Err(e) => return Ok(storage_failure("Failed to count class students", e)),
    };

    let courses = match storage.list_courses_by_class(class_id).await {
        Ok(courses) => courses,
        Err(e) => return Ok(storage_failure("Failed to list class courses", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDetailResponse {
            class,
            teacher_name,
            student_count,
            courses,
        },
        "Class information retrieved successfully",
    )))
}
