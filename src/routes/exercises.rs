use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attempts::requests::{AttemptStatsParams, SubmitAttemptRequest};
use crate::models::exercises::requests::{
    CreateExerciseRequest, ExerciseLibraryParams, UpdateExerciseRequest,
};
use crate::models::files::ImageUploadQuery;
use crate::models::users::entities::UserRole;
use crate::services::{AttemptService, ExerciseService, FileService};
use crate::utils::SafeExerciseIdI64;

// 懒加载的全局 EXERCISE_SERVICE 实例
static EXERCISE_SERVICE: Lazy<ExerciseService> = Lazy::new(ExerciseService::new_lazy);
static ATTEMPT_SERVICE: Lazy<AttemptService> = Lazy::new(AttemptService::new_lazy);
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn list_library(
    req: HttpRequest,
    query: web::Query<ExerciseLibraryParams>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.list_library(&req, query.into_inner()).await
}

pub async fn create_exercise(
    req: HttpRequest,
    exercise_data: web::Json<CreateExerciseRequest>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .create_exercise(&req, exercise_data.into_inner())
        .await
}

pub async fn upload_image(
    req: HttpRequest,
    query: web::Query<ImageUploadQuery>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .upload_exercise_image(&req, query.into_inner(), payload)
        .await
}

pub async fn get_exercise(
    req: HttpRequest,
    exercise_id: SafeExerciseIdI64,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.get_exercise(&req, exercise_id.0).await
}

pub async fn update_exercise(
    req: HttpRequest,
    exercise_id: SafeExerciseIdI64,
    update_data: web::Json<UpdateExerciseRequest>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .update_exercise(&req, exercise_id.0, update_data.into_inner())
        .await
}

pub async fn delete_exercise(
    req: HttpRequest,
    exercise_id: SafeExerciseIdI64,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.delete_exercise(&req, exercise_id.0).await
}

pub async fn submit_attempt(
    req: HttpRequest,
    exercise_id: SafeExerciseIdI64,
    submission: web::Json<SubmitAttemptRequest>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .submit_attempt(&req, exercise_id.0, submission.into_inner())
        .await
}

pub async fn list_my_attempts(
    req: HttpRequest,
    exercise_id: SafeExerciseIdI64,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.list_my_attempts(&req, exercise_id.0).await
}

pub async fn get_progress(
    req: HttpRequest,
    exercise_id: SafeExerciseIdI64,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.get_progress(&req, exercise_id.0).await
}

pub async fn get_stats(
    req: HttpRequest,
    exercise_id: SafeExerciseIdI64,
    query: web::Query<AttemptStatsParams>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .get_stats(&req, exercise_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_exercises_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exercises")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_library)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_exercise)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/images")
                    .wrap(middlewares::RateLimit::file_upload())
                    .route(
                        web::post()
                            .to(upload_image)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{exercise_id}")
                    // 学生视角隐藏答案
                    .route(web::get().to(get_exercise))
                    .route(
                        web::put()
                            .to(update_exercise)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_exercise)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{exercise_id}/attempts")
                    .route(
                        web::post()
                            .to(submit_attempt)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                            .wrap(middlewares::RateLimit::submission()),
                    )
                    .route(
                        web::get()
                            .to(list_my_attempts)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    ),
            )
            .service(
                web::resource("/{exercise_id}/progress").route(
                    web::get()
                        .to(get_progress)
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            )
            .service(
                web::resource("/{exercise_id}/stats").route(
                    web::get()
                        .to(get_stats)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
