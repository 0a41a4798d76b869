use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttemptService;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, forbidden, load_class, load_course, load_exercise, not_found, storage_failure,
};

pub async fn get_attempt(
    service: &AttemptService,
    request: &HttpRequest,
    attempt_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let attempt = match storage.get_attempt_by_id(attempt_id).await {
        Ok(Some(attempt)) => attempt,
        Ok(None) => return Ok(not_found(ErrorCode::AttemptNotFound, "Attempt not found")),
        Err(e) => return Ok(storage_failure("Failed to load attempt", e)),
    };

    let allowed = match user.role {
        UserRole::Admin => true,
        UserRole::Student => attempt.student_id == user.id,
        UserRole::Teacher => {
            let exercise = match load_exercise(&storage, &cache, attempt.exercise_id).await {
                Ok(exercise) => exercise,
                Err(resp) => return Ok(resp),
            };
            if exercise.teacher_id == user.id {
                true
            } else if let Some(course_id) = attempt.course_id {
                // 作答所属课程的班级教师
                let course = match load_course(&storage, course_id).await {
                    Ok(course) => course,
                    Err(resp) => return Ok(resp),
                };
                match load_class(&storage, course.class_id).await {
                    Ok(class) => class.teacher_id == user.id,
                    Err(resp) => return Ok(resp),
                }
            } else {
                false
            }
        }
    };

    if !allowed {
        info!("User {} denied access to attempt {}", user.id, attempt_id);
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "You do not have access to this attempt",
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(attempt, "Attempt retrieved successfully")))
}
