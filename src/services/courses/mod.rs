pub mod create;
pub mod delete;
pub mod exercises;
pub mod get;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::requests::{
    AttachExerciseRequest, CreateCourseRequest, UpdateCourseRequest,
};
use crate::storage::Storage;

/// 课程标题最大长度
pub(crate) const COURSE_TITLE_MAX_CHARS: usize = 200;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
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

    // 在班级中创建课程
    pub async fn create_course(
        &self,
        req: &HttpRequest,
        class_id: i64,
        course_data: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, req, class_id, course_data).await
    }

    // 课程详情（含练习与附件）
    pub async fn get_course(&self, req: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        get::get_course(self, req, course_id).await
    }

    pub async fn update_course(
        &self,
        req: &HttpRequest,
        course_id: i64,
        update_data: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, req, course_id, update_data).await
    }

    pub async fn delete_course(
        &self,
        req: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, req, course_id).await
    }

    pub async fn attach_exercise(
        &self,
        req: &HttpRequest,
        course_id: i64,
        attach_data: AttachExerciseRequest,
    ) -> ActixResult<HttpResponse> {
        exercises::attach_exercise(self, req, course_id, attach_data.exercise_id).await
    }

    pub async fn detach_exercise(
        &self,
        req: &HttpRequest,
        course_id: i64,
        exercise_id: i64,
    ) -> ActixResult<HttpResponse> {
        exercises::detach_exercise(self, req, course_id, exercise_id).await
    }

    // 可添加到课程的练习
    pub async fn available_exercises(
        &self,
        req: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        exercises::available_exercises(self, req, course_id).await
    }
}
