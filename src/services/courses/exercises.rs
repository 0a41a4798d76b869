use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::courses::responses::AvailableExercisesResponse;
use crate::models::exercises::entities::ExerciseSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, forbidden, not_found, require_course_owner, storage_failure,
};

pub async fn attach_exercise(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    exercise_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_course_owner(&storage, &user, course_id).await {
        return Ok(resp);
    }

    let exercise = match storage.get_exercise_by_id(exercise_id).await {
        Ok(Some(exercise)) => exercise,
        Ok(None) => return Ok(not_found(ErrorCode::ExerciseNotFound, "Exercise not found")),
        Err(e) => return Ok(storage_failure("Failed to load exercise", e)),
    };

    // 只能添加自己创建的练习
    if exercise.teacher_id != user.id {
        return Ok(forbidden(
            ErrorCode::ExercisePermissionDenied,
            "You can only attach your own exercises",
        ));
    }

    match storage.is_exercise_attached(course_id, exercise_id).await {
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseExerciseAlreadyAttached,
                "Exercise is already attached to this course",
            )));
        }
        Ok(false) => {}
        Err(e) => return Ok(storage_failure("Failed to check course exercises", e)),
    }

    match storage.attach_exercise(course_id, exercise_id).await {
        Ok(link) => {
            info!("Exercise {} attached to course {}", exercise_id, course_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(link, "Exercise attached")))
        }
        Err(e) => Ok(storage_failure("Failed to attach exercise", e)),
    }
}

pub async fn detach_exercise(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    exercise_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_course_owner(&storage, &user, course_id).await {
        return Ok(resp);
    }

    match storage.detach_exercise(course_id, exercise_id).await {
        Ok(true) => {
            info!("Exercise {} detached from course {}", exercise_id, course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exercise detached")))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::CourseExerciseNotAttached,
            "Exercise is not attached to this course",
        )),
        Err(e) => Ok(storage_failure("Failed to detach exercise", e)),
    }
}

pub async fn available_exercises(
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

    match storage.list_available_exercises(course_id, user.id).await {
        Ok(exercises) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AvailableExercisesResponse {
                items: exercises.iter().map(ExerciseSummary::from).collect(),
            },
            "Available exercises retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("Failed to list available exercises", e)),
    }
}
