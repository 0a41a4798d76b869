use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{COURSE_TITLE_MAX_CHARS, CourseService};
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, not_found, require_course_owner, storage_failure};
use crate::utils::validate::validate_title;

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut update_data: UpdateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_course_owner(&storage, &user, course_id).await {
        return Ok(resp);
    }

    if let Some(title) = update_data.title.take() {
        match validate_title(&title, COURSE_TITLE_MAX_CHARS) {
            Ok(title) => update_data.title = Some(title),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
            }
        }
    }

    match storage.update_course(course_id, update_data).await {
        Ok(Some(course)) => {
            info!("Course {} updated by {}", course_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully")))
        }
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(storage_failure("Failed to update course", e)),
    }
}
