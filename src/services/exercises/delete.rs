use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExerciseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    can_edit_exercise, current_user, forbidden, invalidate_exercise, load_exercise, not_found,
    storage_failure,
};

pub async fn delete_exercise(
    service: &ExerciseService,
    request: &HttpRequest,
    exercise_id: i64,
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
        info!("User {} denied deletion of exercise {}", user.id, exercise_id);
        return Ok(forbidden(
            ErrorCode::ExercisePermissionDenied,
            "Only the creator can delete this exercise",
        ));
    }

    // 课程关联与作答记录随外键级联删除
    let result = storage.delete_exercise(exercise_id).await;
    invalidate_exercise(&cache, exercise_id).await;

    match result {
        Ok(true) => {
            info!("Exercise {} deleted by {}", exercise_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exercise deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ExerciseNotFound, "Exercise not found")),
        Err(e) => Ok(storage_failure("Failed to delete exercise", e)),
    }
}
