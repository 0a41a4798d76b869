use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::ApiResponse;
use crate::models::courses::responses::CourseDetailResponse;
use crate::models::exercises::entities::ExerciseSummary;
use crate::services::access::{current_user, require_course_member, storage_failure};

pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (course, class, _) = match require_course_member(&storage, &user, course_id).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    let exercises = match storage.list_course_exercises(course_id).await {
        Ok(exercises) => exercises.iter().map(ExerciseSummary::from).collect(),
        Err(e) => return Ok(storage_failure("Failed to list course exercises", e)),
    };

    let files = match storage.list_course_files(course_id).await {
        Ok(files) => files,
        Err(e) => return Ok(storage_failure("Failed to list course files", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse {
            course,
            class_name: class.name,
            exercises,
            files,
        },
        "Course retrieved successfully",
    )))
}
