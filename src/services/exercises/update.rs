use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EXERCISE_TITLE_MAX_CHARS, ExerciseService, validate_content};
use crate::models::exercises::requests::UpdateExerciseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    can_edit_exercise, current_user, forbidden, invalidate_exercise, load_exercise, not_found,
    storage_failure,
};
use crate::utils::validate::validate_title;

pub async fn update_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    exercise_id: i64,
    mut update_data: UpdateExerciseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let exercise = match load_exercise(&storage, &cache, exercise_id).await {
        Ok(exercise) => exercise,
        Err(resp) => return Ok(resp),
    };

    if !can_edit_exercise(&user, &exercise) {
        info!("User {} denied update of exercise {}", user.id, exercise_id);
        return Ok(forbidden(
            ErrorCode::ExercisePermissionDenied,
            "Only the creator can modify this exercise",
        ));
    }

    if let Some(title) = update_data.title.take() {
        match validate_title(&title, EXERCISE_TITLE_MAX_CHARS) {
            Ok(title) => update_data.title = Some(title),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
            }
        }
    }

    // 类型不可修改，新内容按原类型重新校验
    if let Some(content) = &update_data.content {
        if let Err(resp) = validate_content(&exercise.exercise_type, content) {
            return Ok(resp);
        }
    }

    let result = storage.update_exercise(exercise_id, update_data).await;
    invalidate_exercise(&cache, exercise_id).await;

    match result {
        Ok(Some(exercise)) => {
            info!("Exercise {} updated by {}", exercise_id, user.username);
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(exercise, "Exercise updated successfully")))
        }
        Ok(None) => Ok(not_found(ErrorCode::ExerciseNotFound, "Exercise not found")),
        Err(e) => Ok(storage_failure("Failed to update exercise", e)),
    }
}
