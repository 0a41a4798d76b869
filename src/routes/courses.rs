use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{AttachExerciseRequest, UpdateCourseRequest};
use crate::models::users::entities::UserRole;
use crate::services::{CourseService, FileService};
use crate::utils::{SafeCourseIdI64, SafeExerciseIdI64, SafeFileIdI64};

// 懒加载的全局 COURSE_SERVICE 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn get_course(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, course_id.0, update_data.into_inner())
        .await
}

pub async fn delete_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, course_id.0).await
}

pub async fn attach_exercise(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    attach_data: web::Json<AttachExerciseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .attach_exercise(&req, course_id.0, attach_data.into_inner())
        .await
}

pub async fn detach_exercise(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    exercise_id: SafeExerciseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .detach_exercise(&req, course_id.0, exercise_id.0)
        .await
}

pub async fn available_exercises(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.available_exercises(&req, course_id.0).await
}

pub async fn upload_file(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .upload_course_file(&req, course_id.0, payload)
        .await
}

pub async fn download_file(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    file_id: SafeFileIdI64,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .download_course_file(&req, course_id.0, file_id.0)
        .await
}

pub async fn delete_file(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    file_id: SafeFileIdI64,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .delete_course_file(&req, course_id.0, file_id.0)
        .await
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{course_id}")
                    // 所有者、班级学生与管理员
                    .route(web::get().to(get_course))
                    .route(
                        web::put()
                            .to(update_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{course_id}/exercises").route(
                    web::post()
                        .to(attach_exercise)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{course_id}/exercises/{exercise_id}").route(
                    web::delete()
                        .to(detach_exercise)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{course_id}/available-exercises").route(
                    web::get()
                        .to(available_exercises)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{course_id}/files")
                    .wrap(middlewares::RateLimit::file_upload())
                    .route(
                        web::post()
                            .to(upload_file)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{course_id}/files/{file_id}")
                    .route(web::get().to(download_file))
                    .route(
                        web::delete()
                            .to(delete_file)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
