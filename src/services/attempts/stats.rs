use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttemptService;
use crate::config::AppConfig;
use crate::models::attempts::entities::{AttemptProgress, AttemptSummary, ExerciseAttempt};
use crate::models::attempts::requests::AttemptStatsParams;
use crate::models::attempts::responses::{ExerciseStatsResponse, StudentProgress};
use crate::models::exercises::entities::Exercise;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, forbidden, load_class, load_course, load_exercise, storage_failure,
};
use crate::storage::Storage;

pub async fn get_stats(
    service: &AttemptService,
    request: &HttpRequest,
    exercise_id: i64,
    query: AttemptStatsParams,
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

    if let Err(resp) = check_stats_access(&storage, &user, &exercise).await {
        return Ok(resp);
    }

    let attempts = match storage
        .list_exercise_attempts(exercise_id, query.course_id)
        .await
    {
        Ok(attempts) => attempts,
        Err(e) => return Ok(storage_failure("Failed to list exercise attempts", e)),
    };
    let max_attempts = AppConfig::get().effective_max_attempts(exercise.max_attempts);

    // 指定课程时列出班级全部学生（包括未作答的），否则列出作答过的学生
    let students = match query.course_id {
        Some(course_id) => {
            match course_students(&storage, &user, course_id, exercise_id, &attempts, max_attempts)
                .await
            {
                Ok(students) => students,
                Err(resp) => return Ok(resp),
            }
        }
        None => {
            let ids: Vec<i64> = attempts
                .iter()
                .map(|a| a.student_id)
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            match storage.get_users_by_ids(&ids).await {
                Ok(users) => students_from_users(users, &attempts, max_attempts),
                Err(e) => return Ok(storage_failure("Failed to load students", e)),
            }
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ExerciseStatsResponse {
            exercise_id,
            course_id: query.course_id,
            summary: AttemptSummary::compute(&attempts),
            students,
        },
        "Exercise statistics retrieved successfully",
    )))
}

/// 课程所在班级的全部学生，只有班级教师或管理员可查看
async fn course_students(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
    exercise_id: i64,
    attempts: &[ExerciseAttempt],
    max_attempts: Option<i32>,
) -> Result<Vec<StudentProgress>, HttpResponse> {
    let course = load_course(storage, course_id).await?;
    let class = load_class(storage, course.class_id).await?;
    if !user.is_admin() && class.teacher_id != user.id {
        info!("User {} denied stats for course {}", user.id, course_id);
        return Err(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only the class teacher can view course statistics",
        ));
    }

    match storage.is_exercise_attached(course_id, exercise_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::CourseExerciseNotAttached,
                "Exercise is not part of this course",
            )));
        }
        Err(e) => return Err(storage_failure("Failed to check course exercises", e)),
    }

    match storage.list_class_students(class.id).await {
        Ok(members) => Ok(members
            .into_iter()
            .map(|m| StudentProgress {
                progress: progress_for(attempts, m.student_id, max_attempts),
                student_id: m.student_id,
                username: m.username,
                display_name: m.display_name,
            })
            .collect()),
        Err(e) => Err(storage_failure("Failed to list class students", e)),
    }
}

/// 练习创建者、课程包含该练习的教师或管理员
async fn check_stats_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    exercise: &Exercise,
) -> Result<(), HttpResponse> {
    if user.is_admin() || exercise.teacher_id == user.id {
        return Ok(());
    }
    match storage
        .teacher_has_exercise_in_courses(user.id, exercise.id)
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => {
            info!("User {} denied stats for exercise {}", user.id, exercise.id);
            Err(forbidden(
                ErrorCode::ExercisePermissionDenied,
                "You do not have access to this exercise's statistics",
            ))
        }
        Err(e) => Err(storage_failure("Failed to check exercise access", e)),
    }
}

fn progress_for(
    attempts: &[ExerciseAttempt],
    student_id: i64,
    max_attempts: Option<i32>,
) -> AttemptProgress {
    let own: Vec<ExerciseAttempt> = attempts
        .iter()
        .filter(|a| a.student_id == student_id)
        .cloned()
        .collect();
    AttemptProgress::compute(&own, max_attempts)
}

/// 按用户名排序
fn students_from_users(
    users: Vec<User>,
    attempts: &[ExerciseAttempt],
    max_attempts: Option<i32>,
) -> Vec<StudentProgress> {
    let by_name: BTreeMap<String, User> =
        users.into_iter().map(|u| (u.username.clone(), u)).collect();
    by_name
        .into_values()
        .map(|u| StudentProgress {
            progress: progress_for(attempts, u.id, max_attempts),
            student_id: u.id,
            username: u.username,
            display_name: u.display_name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::services::attempts::test_support::Fixture;
    use actix_web::http::StatusCode;
    use chrono::{TimeZone, Utc};

    fn attempt(id: i64, student_id: i64, score: f64) -> ExerciseAttempt {
        ExerciseAttempt {
            id,
            student_id,
            exercise_id: 1,
            course_id: None,
            score,
            answers: serde_json::json!({}),
            feedback: serde_json::json!({}),
            completed: true,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    fn student(id: i64, username: &str) -> User {
        let now = Utc::now();
        User {
            id,
            username: username.into(),
            email: format!("{username}@ecole.fr"),
            password_hash: String::new(),
            role: UserRole::Student,
            status: UserStatus::Active,
            display_name: None,
            school_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_progress_for_filters_student() {
        let attempts = vec![attempt(1, 7, 20.0), attempt(2, 8, 90.0), attempt(3, 7, 60.0)];
        let progress = progress_for(&attempts, 7, Some(3));
        assert_eq!(progress.attempts_count, 2);
        assert_eq!(progress.best_score, Some(60.0));
        assert_eq!(progress.last_score, Some(60.0));
        assert_eq!(progress.remaining_attempts, Some(1));

        let none = progress_for(&attempts, 9, None);
        assert_eq!(none.attempts_count, 0);
        assert_eq!(none.remaining_attempts, None);
    }

    #[test]
    fn test_students_sorted_by_username() {
        let attempts = vec![attempt(1, 2, 50.0), attempt(2, 1, 100.0)];
        let students = students_from_users(
            vec![student(2, "zoe_martin"), student(1, "adam_leroy")],
            &attempts,
            None,
        );
        let names: Vec<&str> = students.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, ["adam_leroy", "zoe_martin"]);
        assert_eq!(students[0].progress.best_score, Some(100.0));
    }

    #[tokio::test]
    async fn test_course_stats_require_attached_exercise() {
        let f = Fixture::new(None).await;
        f.enroll().await;
        let resp = course_students(&f.storage, &f.teacher, f.course.id, f.exercise.id, &[], None)
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        f.attach().await;
        let students =
            course_students(&f.storage, &f.teacher, f.course.id, f.exercise.id, &[], None)
                .await
                .unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].student_id, f.student.id);
        assert_eq!(students[0].progress.attempts_count, 0);
    }

    #[tokio::test]
    async fn test_course_stats_other_teacher_forbidden() {
        let f = Fixture::new(None).await;
        f.attach().await;
        let resp = course_students(&f.storage, &f.student, f.course.id, f.exercise.id, &[], None)
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
