use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{
    ClassQueryParams, CreateClassRequest, JoinClassRequest, UpdateClassRequest,
};
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::services::{ClassService, CourseService};
use crate::utils::{SafeClassIdI64, SafeStudentIdI64};

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn join_class(
    req: HttpRequest,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.join_class(&req, join_data.into_inner()).await
}

pub async fn get_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, class_id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, class_id.0).await
}

pub async fn list_students(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_students(&req, class_id.0).await
}

pub async fn remove_student(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .remove_student(&req, class_id.0, student_id.0)
        .await
}

pub async fn create_course(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, class_id.0, course_data.into_inner())
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 按角色返回可见的班级
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                // 访问码可被枚举，单独限流
                web::resource("/join")
                    .wrap(middlewares::RateLimit::class_join())
                    .route(
                        web::post()
                            .to(join_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    ),
            )
            .service(
                web::resource("/{class_id}")
                    // 所有者、班级学生与管理员
                    .route(web::get().to(get_class))
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{class_id}/students").route(
                    web::get()
                        .to(list_students)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{class_id}/students/{student_id}").route(
                    web::delete()
                        .to(remove_student)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{class_id}/courses").route(
                    web::post()
                        .to(create_course)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
