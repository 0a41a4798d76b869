use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AttemptService, lock};
use crate::config::AppConfig;
use crate::models::attempts::entities::AttemptProgress;
use crate::models::attempts::requests::{NewExerciseAttempt, SubmitAttemptRequest};
use crate::models::attempts::responses::SubmitAttemptResponse;
use crate::models::exercises::entities::Exercise;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{ExerciseDefinition, GradingOptions, evaluate};
use crate::services::access::{
    current_user, forbidden, load_class, load_course, load_exercise, storage_failure,
};
use crate::storage::Storage;

pub async fn submit_attempt(
    service: &AttemptService,
    request: &HttpRequest,
    exercise_id: i64,
    submission: SubmitAttemptRequest,
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

    // 1. 访问校验
    if let Err(resp) = check_submission_access(&storage, &user, &exercise, submission.course_id).await
    {
        return Ok(resp);
    }

    // 2. 题目内容无法解析时不计入次数
    let definition =
        match ExerciseDefinition::parse_str(&exercise.exercise_type, &exercise.content) {
            Ok(definition) => definition,
            Err(e) => {
                error!("Exercise {} cannot be graded: {}", exercise_id, e);
                return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                    ErrorCode::AttemptUngradable,
                    format!("This exercise cannot be graded: {}", e.message()),
                )));
            }
        };

    // 3. 次数检查、评分与写入在锁内完成
    let response = lock::serialized(
        user.id,
        exercise_id,
        grade_and_record(&storage, &user, &exercise, &definition, submission),
    )
    .await;

    Ok(response)
}

async fn check_submission_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    exercise: &Exercise,
    course_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(course_id) = course_id else {
        // 未指定课程时，练习必须出现在学生某个班级的课程中
        return match storage.student_can_access_exercise(user.id, exercise.id).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                info!("Student {} cannot reach exercise {}", user.id, exercise.id);
                Err(forbidden(
                    ErrorCode::AttemptNotEnrolled,
                    "This exercise is not part of your courses",
                ))
            }
            Err(e) => Err(storage_failure("Failed to check exercise access", e)),
        };
    };

    let course = load_course(storage, course_id).await?;
    let class = load_class(storage, course.class_id).await?;

    match storage.is_student_enrolled(class.id, user.id).await {
        Ok(true) => {}
        Ok(false) => {
            info!("Student {} is not enrolled in class {}", user.id, class.id);
            return Err(forbidden(
                ErrorCode::AttemptNotEnrolled,
                "You are not enrolled in this course's class",
            ));
        }
        Err(e) => return Err(storage_failure("Failed to check class membership", e)),
    }

    match storage.is_exercise_attached(course_id, exercise.id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseExerciseNotAttached,
            "Exercise is not part of this course",
        ))),
        Err(e) => Err(storage_failure("Failed to check course exercises", e)),
    }
}

async fn grade_and_record(
    storage: &Arc<dyn Storage>,
    user: &User,
    exercise: &Exercise,
    definition: &ExerciseDefinition,
    submission: SubmitAttemptRequest,
) -> HttpResponse {
    let config = AppConfig::get();
    let max_attempts = config.effective_max_attempts(exercise.max_attempts);

    if let Some(max) = max_attempts {
        match storage.count_student_attempts(user.id, exercise.id).await {
            Ok(used) if used >= max as i64 => {
                info!(
                    "Student {} reached the attempt limit on exercise {} ({}/{})",
                    user.id, exercise.id, used, max
                );
                return forbidden(
                    ErrorCode::AttemptLimitReached,
                    "You have used all attempts for this exercise",
                );
            }
            Ok(_) => {}
            Err(e) => return storage_failure("Failed to count attempts", e),
        }
    }

    let options = GradingOptions {
        order_insensitive_blanks: config.exercises.order_insensitive_blanks,
        description: exercise.description.clone(),
    };
    let evaluation = evaluate(definition, &submission.answers, &options);

    let new_attempt = NewExerciseAttempt {
        student_id: user.id,
        exercise_id: exercise.id,
        course_id: submission.course_id,
        score: evaluation.score,
        answers: evaluation.answers,
        feedback: evaluation.feedback,
    };

    let attempt = match storage.create_attempt(new_attempt).await {
        Ok(attempt) => attempt,
        Err(e) => return storage_failure("Failed to save attempt", e),
    };

    let attempts = match storage.list_student_attempts(user.id, exercise.id).await {
        Ok(attempts) => attempts,
        Err(e) => return storage_failure("Failed to load attempts", e),
    };

    info!(
        "Student {} scored {:.2} on exercise {} (attempt {})",
        user.id, attempt.score, exercise.id, attempt.id
    );

    HttpResponse::Created().json(ApiResponse::success(
        SubmitAttemptResponse {
            attempt,
            progress: AttemptProgress::compute(&attempts, max_attempts),
        },
        "Attempt submitted successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{AnswerSheet, ExerciseType};
    use crate::services::attempts::test_support::Fixture;
    use actix_web::http::StatusCode;

    async fn access(f: &Fixture, course_id: Option<i64>) -> Result<(), HttpResponse> {
        check_submission_access(&f.storage, &f.student, &f.exercise, course_id).await
    }

    async fn submit(f: &Fixture) -> HttpResponse {
        let definition = ExerciseDefinition::parse(ExerciseType::Qcm, &f.exercise.content).unwrap();
        let submission = SubmitAttemptRequest {
            course_id: None,
            answers: AnswerSheet::new().with("answer_0", "1"),
        };
        grade_and_record(&f.storage, &f.student, &f.exercise, &definition, submission).await
    }

    #[tokio::test]
    async fn test_unknown_course_is_not_found() {
        let f = Fixture::new(None).await;
        let resp = access(&f, Some(f.course.id + 100)).await.unwrap_err();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_student_outside_class_is_forbidden() {
        let f = Fixture::new(None).await;
        f.attach().await;
        let resp = access(&f, Some(f.course.id)).await.unwrap_err();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_exercise_not_in_course_is_bad_request() {
        let f = Fixture::new(None).await;
        f.enroll().await;
        let resp = access(&f, Some(f.course.id)).await.unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        f.attach().await;
        assert!(access(&f, Some(f.course.id)).await.is_ok());
    }

    #[tokio::test]
    async fn test_without_course_exercise_must_be_reachable() {
        let f = Fixture::new(None).await;
        f.attach().await;
        let resp = access(&f, None).await.unwrap_err();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        f.enroll().await;
        assert!(access(&f, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_attempt_limit_enforced() {
        let f = Fixture::new(Some(1)).await;
        f.enroll().await;
        f.attach().await;

        assert_eq!(submit(&f).await.status(), StatusCode::CREATED);
        assert_eq!(submit(&f).await.status(), StatusCode::FORBIDDEN);
        let used = f
            .storage
            .count_student_attempts(f.student.id, f.exercise.id)
            .await
            .unwrap();
        assert_eq!(used, 1);
    }
}
