use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExerciseService, clean_optional};
use crate::models::ApiResponse;
use crate::models::exercises::requests::{ExerciseLibraryParams, ExerciseListQuery};
use crate::scoring::ExerciseType;
use crate::services::access::{current_user, storage_failure};

pub async fn list_library(
    service: &ExerciseService,
    request: &HttpRequest,
    query: ExerciseLibraryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    Ok(match storage
        .list_exercises_with_pagination(build_query(query, user.id))
        .await
    {
        Ok(response) => HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Exercise library retrieved successfully",
        )),
        Err(e) => storage_failure("Failed to list exercises", e),
    })
}

fn build_query(params: ExerciseLibraryParams, user_id: i64) -> ExerciseListQuery {
    // 别名按规范名称筛选，无法识别的类型原样传递
    let exercise_type = clean_optional(params.exercise_type).map(|t| {
        t.parse::<ExerciseType>()
            .map(|parsed| parsed.as_str().to_string())
            .unwrap_or(t)
    });

    ExerciseListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        teacher_id: params.mine.then_some(user_id),
        exercise_type,
        subject: clean_optional(params.subject),
        search: params.search,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;

    fn params(exercise_type: Option<&str>, mine: bool) -> ExerciseLibraryParams {
        ExerciseLibraryParams {
            pagination: PaginationQuery::default(),
            exercise_type: exercise_type.map(String::from),
            subject: Some(" ".into()),
            search: Some("fractions".into()),
            mine,
        }
    }

    #[test]
    fn test_build_query_mine_filters_teacher() {
        let query = build_query(params(None, true), 42);
        assert_eq!(query.teacher_id, Some(42));
        assert_eq!(query.subject, None);
        assert_eq!(query.search.as_deref(), Some("fractions"));

        let query = build_query(params(None, false), 42);
        assert_eq!(query.teacher_id, None);
    }

    #[test]
    fn test_build_query_normalizes_type_alias() {
        let query = build_query(params(Some("souligne_mots"), false), 1);
        assert_eq!(query.exercise_type.as_deref(), Some("underline_words"));

        let query = build_query(params(Some("crossword"), false), 1);
        assert_eq!(query.exercise_type.as_deref(), Some("crossword"));
    }
}
