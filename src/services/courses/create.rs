use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{COURSE_TITLE_MAX_CHARS, CourseService};
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, forbidden, load_class, storage_failure};
use crate::utils::validate::validate_title;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    class_id: i64,
    mut course_data: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let class = match load_class(&storage, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    // 只有班级教师可以添加课程
    if class.teacher_id != user.id {
        info!("User {} denied course creation in class {}", user.id, class_id);
        return Ok(forbidden(
            ErrorCode::ClassPermissionDenied,
            "Only the class teacher can add courses",
        ));
    }

    course_data.title = match validate_title(&course_data.title, COURSE_TITLE_MAX_CHARS) {
        Ok(title) => title,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    match storage.create_course(class_id, course_data).await {
        Ok(course) => {
            info!("Course {} created in class {}", course.id, class_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(storage_failure("Failed to create course", e)),
    }
}
