use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::AttemptService;
use crate::utils::SafeAttemptIdI64;

// 懒加载的全局 ATTEMPT_SERVICE 实例
static ATTEMPT_SERVICE: Lazy<AttemptService> = Lazy::new(AttemptService::new_lazy);

pub async fn get_attempt(
    req: HttpRequest,
    attempt_id: SafeAttemptIdI64,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.get_attempt(&req, attempt_id.0).await
}

// 配置路由
pub fn configure_attempts_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attempts")
            .wrap(middlewares::RequireJWT)
            // 学生本人、相关教师与管理员，在服务层判断
            .route("/{attempt_id}", web::get().to(get_attempt)),
    );
}
