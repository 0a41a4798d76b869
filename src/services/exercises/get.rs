use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ExerciseService;
use crate::config::AppConfig;
use crate::models::attempts::entities::AttemptProgress;
use crate::models::exercises::responses::ExerciseDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{ExerciseType, redact_answers};
use crate::services::access::{current_user, forbidden, load_exercise, storage_failure};

pub async fn get_exercise(
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

    let mut exercise = match load_exercise(&storage, &cache, exercise_id).await {
        Ok(exercise) => exercise,
        Err(resp) => return Ok(resp),
    };

    // 教师与管理员看到完整内容
    if user.role.is_teacher_or_admin() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExerciseDetailResponse {
                exercise,
                progress: None,
            },
            "Exercise retrieved successfully",
        )));
    }

    match storage.student_can_access_exercise(user.id, exercise_id).await {
        Ok(true) => {}
        Ok(false) => {
            info!("Student {} denied access to exercise {}", user.id, exercise_id);
            return Ok(forbidden(
                ErrorCode::ExercisePermissionDenied,
                "This exercise is not part of your courses",
            ));
        }
        Err(e) => return Ok(storage_failure("Failed to check exercise access", e)),
    }

    match exercise.exercise_type.parse::<ExerciseType>() {
        Ok(exercise_type) => {
            exercise.content = redact_answers(exercise_type, &exercise.content);
        }
        Err(e) => {
            // 未知类型不下发内容
            warn!("Exercise {} has unknown type: {}", exercise_id, e);
            exercise.content = serde_json::Value::Null;
        }
    }

    let attempts = match storage.list_student_attempts(user.id, exercise_id).await {
        Ok(attempts) => attempts,
        Err(e) => return Ok(storage_failure("Failed to load attempts", e)),
    };
    let max_attempts = AppConfig::get().effective_max_attempts(exercise.max_attempts);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ExerciseDetailResponse {
            exercise,
            progress: Some(AttemptProgress::compute(&attempts, max_attempts)),
        },
        "Exercise retrieved successfully",
    )))
}
