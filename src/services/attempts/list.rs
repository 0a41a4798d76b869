use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttemptService;
use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::attempts::entities::AttemptProgress;
use crate::models::attempts::responses::AttemptListResponse;
use crate::services::access::{current_user, load_exercise, storage_failure};

pub async fn list_my_attempts(
    service: &AttemptService,
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

    // 最新在前
    let items = match storage.list_student_attempts(user.id, exercise_id).await {
        Ok(items) => items,
        Err(e) => return Ok(storage_failure("Failed to list attempts", e)),
    };
    let max_attempts = AppConfig::get().effective_max_attempts(exercise.max_attempts);
    let progress = AttemptProgress::compute(&items, max_attempts);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttemptListResponse { items, progress },
        "Attempts retrieved successfully",
    )))
}
