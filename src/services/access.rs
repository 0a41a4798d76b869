//! 服务层共用的身份与权限校验
//!
//! 校验失败时直接返回可发送给客户端的 `HttpResponse`。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, info};

use crate::cache::{CacheResult, ObjectCache, keys};
use crate::errors::ClassNumError;
use crate::middlewares::RequireJWT;
use crate::models::classes::entities::Class;
use crate::models::courses::entities::Course;
use crate::models::exercises::entities::Exercise;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 当前用户在班级中的身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassRole {
    Owner,
    Student,
    Admin,
}

impl ClassRole {
    pub(crate) fn can_manage(self) -> bool {
        matches!(self, ClassRole::Owner | ClassRole::Admin)
    }
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

/// 存储层错误统一记录并返回 500
pub(crate) fn storage_failure(context: &str, err: ClassNumError) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {}", err.message()),
    ))
}

pub(crate) fn forbidden(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Err(storage_failure("Failed to load class", e)),
    }
}

/// 用户在班级中的身份，无关用户返回 `None`
pub(crate) async fn class_role(
    storage: &Arc<dyn Storage>,
    user: &User,
    class: &Class,
) -> Result<Option<ClassRole>, HttpResponse> {
    if user.role == UserRole::Admin {
        return Ok(Some(ClassRole::Admin));
    }
    if class.teacher_id == user.id {
        return Ok(Some(ClassRole::Owner));
    }
    if user.role == UserRole::Student {
        return match storage.is_student_enrolled(class.id, user.id).await {
            Ok(true) => Ok(Some(ClassRole::Student)),
            Ok(false) => Ok(None),
            Err(e) => Err(storage_failure("Failed to check class membership", e)),
        };
    }
    Ok(None)
}

/// 班级所有者、已加入的学生或管理员
pub(crate) async fn require_class_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<(Class, ClassRole), HttpResponse> {
    let class = load_class(storage, class_id).await?;
    match class_role(storage, user, &class).await? {
        Some(role) => Ok((class, role)),
        None => {
            info!("User {} denied access to class {}", user.id, class_id);
            Err(forbidden(
                ErrorCode::ClassPermissionDenied,
                "You do not have access to this class",
            ))
        }
    }
}

/// 班级所有者或管理员
pub(crate) async fn require_class_manager(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    let class = load_class(storage, class_id).await?;
    match class_role(storage, user, &class).await? {
        Some(role) if role.can_manage() => Ok(class),
        _ => {
            info!("User {} denied management of class {}", user.id, class_id);
            Err(forbidden(
                ErrorCode::ClassPermissionDenied,
                "Only the class teacher can manage this class",
            ))
        }
    }
}

pub(crate) async fn load_course(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<Course, HttpResponse> {
    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => Ok(course),
        Ok(None) => Err(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Err(storage_failure("Failed to load course", e)),
    }
}

/// 课程所在班级的成员（所有者、学生、管理员）
pub(crate) async fn require_course_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
) -> Result<(Course, Class, ClassRole), HttpResponse> {
    let course = load_course(storage, course_id).await?;
    let class = load_class(storage, course.class_id).await?;
    match class_role(storage, user, &class).await? {
        Some(role) => Ok((course, class, role)),
        None => {
            info!("User {} denied access to course {}", user.id, course_id);
            Err(forbidden(
                ErrorCode::CoursePermissionDenied,
                "You do not have access to this course",
            ))
        }
    }
}

/// 只有班级所有者可以修改课程
pub(crate) async fn require_course_owner(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
) -> Result<(Course, Class), HttpResponse> {
    let course = load_course(storage, course_id).await?;
    let class = load_class(storage, course.class_id).await?;
    if class.teacher_id != user.id {
        info!("User {} denied modification of course {}", user.id, course_id);
        return Err(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only the class teacher can modify this course",
        ));
    }
    Ok((course, class))
}

/// 读取练习，优先走缓存
pub(crate) async fn load_exercise(
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
    exercise_id: i64,
) -> Result<Exercise, HttpResponse> {
    let key = keys::exercise(exercise_id);
    if let CacheResult::Found(exercise) = cache.get::<Exercise>(&key).await {
        return Ok(exercise);
    }

    match storage.get_exercise_by_id(exercise_id).await {
        Ok(Some(exercise)) => {
            cache.insert(key, &exercise, 0).await;
            Ok(exercise)
        }
        Ok(None) => Err(not_found(ErrorCode::ExerciseNotFound, "Exercise not found")),
        Err(e) => Err(storage_failure("Failed to load exercise", e)),
    }
}

pub(crate) async fn invalidate_exercise(cache: &Arc<dyn ObjectCache>, exercise_id: i64) {
    cache.remove(&keys::exercise(exercise_id)).await;
}

/// 练习的创建者或管理员
pub(crate) fn can_edit_exercise(user: &User, exercise: &Exercise) -> bool {
    user.is_admin() || exercise.teacher_id == user.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@ecole.fr"),
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

    fn exercise(teacher_id: i64) -> Exercise {
        let now = chrono::Utc::now();
        Exercise {
            id: 1,
            teacher_id,
            title: "Les fractions".into(),
            description: None,
            exercise_type: "qcm".into(),
            content: serde_json::json!({}),
            subject: Some("mathematiques".into()),
            image_path: None,
            max_attempts: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_class_role_can_manage() {
        assert!(ClassRole::Owner.can_manage());
        assert!(ClassRole::Admin.can_manage());
        assert!(!ClassRole::Student.can_manage());
    }

    #[test]
    fn test_can_edit_exercise() {
        let ex = exercise(7);
        assert!(can_edit_exercise(&user(7, UserRole::Teacher), &ex));
        assert!(can_edit_exercise(&user(1, UserRole::Admin), &ex));
        assert!(!can_edit_exercise(&user(8, UserRole::Teacher), &ex));
        assert!(!can_edit_exercise(&user(9, UserRole::Student), &ex));
    }
}
