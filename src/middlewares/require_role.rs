/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后使用，用于验证用户是否具有特定角色权限。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App, HttpServer};
 * use crate::middlewares::require_jwt::RequireJWT;
 * use crate::middlewares::require_role::RequireRole;
 * use crate::models::users::entities::UserRole;
 *
 * web::scope("/api/v1/exercises")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::resource("")
 *             .route(web::post().to(create_exercise).wrap(RequireRole::new_any(UserRole::teacher_roles())))
 *     )
 * ```
 *
 * 注意 actix 中后 wrap 的中间件先执行，RequireJWT 必须包在外层。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

/// 角色守卫，用户只有一个角色，命中允许列表即放行
#[derive(Clone)]
pub struct RequireRole {
    allowed: Vec<UserRole>,
}

impl RequireRole {
    /// 只允许单一角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: vec![*role],
        }
    }

    /// 允许列表中的任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| **r).collect(),
        }
    }

    fn permits(allowed: &[UserRole], user: &User) -> bool {
        allowed.contains(&user.role)
    }

    fn describe(allowed: &[UserRole]) -> String {
        allowed
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: Rc::new(self.allowed.clone()),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<UserRole>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            let Some(user) = user else {
                // RequireJWT 未生效
                info!("Role check on {} without an authenticated user", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if RequireRole::permits(&allowed, &user) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let expected = RequireRole::describe(&allowed);
            info!(
                "User {} ({}) denied on {} {}, expected role: {}",
                user.id,
                user.role,
                req.method(),
                req.path(),
                expected
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    &format!("This action requires role: {expected}"),
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user_with(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            username: "lucie_m".to_string(),
            email: "lucie@ecole.fr".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            school_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_any_collects_roles() {
        let guard = RequireRole::new_any(UserRole::teacher_roles());
        assert_eq!(guard.allowed, vec![UserRole::Teacher, UserRole::Admin]);

        let admin = RequireRole::new(&UserRole::Admin);
        assert_eq!(admin.allowed, vec![UserRole::Admin]);
    }

    #[test]
    fn test_permits() {
        let teachers = RequireRole::new_any(UserRole::teacher_roles()).allowed;
        assert!(RequireRole::permits(&teachers, &user_with(UserRole::Admin)));
        assert!(RequireRole::permits(&teachers, &user_with(UserRole::Teacher)));
        assert!(!RequireRole::permits(&teachers, &user_with(UserRole::Student)));

        let students = RequireRole::new_any(UserRole::student_roles()).allowed;
        assert!(!RequireRole::permits(&students, &user_with(UserRole::Teacher)));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            RequireRole::describe(&[UserRole::Teacher, UserRole::Admin]),
            "teacher, admin"
        );
    }
}
