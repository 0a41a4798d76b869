use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EXERCISE_TITLE_MAX_CHARS, ExerciseService, clean_optional, validate_content};
use crate::models::exercises::requests::CreateExerciseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, storage_failure};
use crate::utils::validate::validate_title;

pub async fn create_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    mut exercise_data: CreateExerciseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    exercise_data.title = match validate_title(&exercise_data.title, EXERCISE_TITLE_MAX_CHARS) {
        Ok(title) => title,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    // 内容不合法的练习不入库
    let exercise_type =
        match validate_content(&exercise_data.exercise_type, &exercise_data.content) {
            Ok(t) => t,
            Err(resp) => return Ok(resp),
        };
    exercise_data.exercise_type = exercise_type.as_str().to_string();
    exercise_data.description = clean_optional(exercise_data.description);
    exercise_data.subject = clean_optional(exercise_data.subject);
    exercise_data.image_path = clean_optional(exercise_data.image_path);

    match storage.create_exercise(user.id, exercise_data).await {
        Ok(exercise) => {
            info!(
                "Exercise {} ({}) created by {}",
                exercise.id, exercise.exercise_type, user.username
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(exercise, "Exercise created successfully")))
        }
        Err(e) => Ok(storage_failure("Failed to create exercise", e)),
    }
}
