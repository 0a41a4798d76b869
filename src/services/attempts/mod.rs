pub mod detail;
pub mod list;
pub mod lock;
pub mod progress;
pub mod stats;
pub mod submit;

#[cfg(test)]
mod test_support;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::attempts::requests::{AttemptStatsParams, SubmitAttemptRequest};
use crate::storage::Storage;

pub struct AttemptService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttemptService {
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

    // 提交作答并评分
    pub async fn submit_attempt(
        &self,
        req: &HttpRequest,
        exercise_id: i64,
        submission: SubmitAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_attempt(self, req, exercise_id, submission).await
    }

    // 当前学生的作答记录
    pub async fn list_my_attempts(
        &self,
        req: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_my_attempts(self, req, exercise_id).await
    }

    pub async fn get_attempt(&self, req: &HttpRequest, attempt_id: i64) -> ActixResult<HttpResponse> {
        detail::get_attempt(self, req, attempt_id).await
    }

    pub async fn get_progress(
        &self,
        req: &HttpRequest,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        progress::get_progress(self, req, exercise_id).await
    }

    // 练习统计（教师视角）
    pub async fn get_stats(
        &self,
        req: &HttpRequest,
        exercise_id: i64,
        query: AttemptStatsParams,
    ) -> ActixResult<HttpResponse> {
        stats::get_stats(self, req, exercise_id, query).await
    }
}
