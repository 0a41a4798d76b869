pub mod create;
pub mod delete;
pub mod get;
pub mod library;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::cache::ObjectCache;
use crate::errors::ClassNumError;
use crate::models::exercises::requests::{
    CreateExerciseRequest, ExerciseLibraryParams, UpdateExerciseRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{ExerciseDefinition, ExerciseType};
use crate::storage::Storage;

/// 练习标题最大长度
pub(crate) const EXERCISE_TITLE_MAX_CHARS: usize = 200;

pub struct ExerciseService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExerciseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    pub async fn create_exercise(
        &self,
        req: &HttpRequest,
        exercise_data: CreateExerciseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exercise(self, req, exercise_data).await
    }

    // 练习详情，学生视角隐藏答案
    pub async fn get_exercise(
        &self,
        req: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_exercise(self, req, exercise_id).await
    }

    pub async fn update_exercise(
        &self,
        req: &HttpRequest,
        exercise_id: i64,
        update_data: UpdateExerciseRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_exercise(self, req, exercise_id, update_data).await
    }

    pub async fn delete_exercise(
        &self,
        req: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_exercise(self, req, exercise_id).await
    }

    // 练习库
    pub async fn list_library(
        &self,
        req: &HttpRequest,
        query: ExerciseLibraryParams,
    ) -> ActixResult<HttpResponse> {
        library::list_library(self, req, query).await
    }
}

/// 校验练习内容，返回规范化后的类型
pub(crate) fn validate_content(
    exercise_type: &str,
    content: &Value,
) -> Result<ExerciseType, HttpResponse> {
    match ExerciseDefinition::parse_str(exercise_type, content) {
        Ok(definition) => Ok(definition.exercise_type()),
        Err(ClassNumError::UnsupportedExerciseType(msg)) => {
            info!("Rejected exercise type {}: {}", exercise_type, msg);
            Err(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ExerciseTypeUnsupported, msg)))
        }
        Err(e) => {
            info!("Rejected {} content: {}", exercise_type, e.message());
            Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ExerciseContentInvalid,
                e.message(),
            )))
        }
    }
}

/// 可选文本字段：去除首尾空白，空串视为未填写
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_content_normalizes_alias() {
        let content = json!({
            "sentences": [{"text": "Le chat dort.", "words_to_underline": ["chat"]}]
        });
        let result = validate_content("souligne_mots", &content);
        assert_eq!(result.ok(), Some(ExerciseType::UnderlineWords));
    }

    #[test]
    fn test_validate_content_rejects_unknown_type() {
        let resp = validate_content("crossword", &json!({})).unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validate_content_rejects_bad_content() {
        let resp = validate_content("qcm", &json!({"questions": "none"})).unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  CM1 ".into())).as_deref(), Some("CM1"));
        assert_eq!(clean_optional(Some("   ".into())), None);
        assert_eq!(clean_optional(None), None);
    }
}
