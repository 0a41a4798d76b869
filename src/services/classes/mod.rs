pub mod create;
pub mod delete;
pub mod get;
pub mod join;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{
    ClassQueryParams, CreateClassRequest, JoinClassRequest, UpdateClassRequest,
};
use crate::storage::Storage;

/// 班级名称最大长度
pub(crate) const CLASS_NAME_MAX_CHARS: usize = 100;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
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

    // 获取班级列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        req: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, req, class_data).await
    }

    // 班级详情（含课程）
    pub async fn get_class(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, req, class_id).await
    }

    pub async fn update_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, req, class_id, update_data).await
    }

    pub async fn delete_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, req, class_id).await
    }

    // 学生通过访问码加入班级
    pub async fn join_class(
        &self,
        req: &HttpRequest,
        join_data: JoinClassRequest,
    ) -> ActixResult<HttpResponse> {
        join::join_class(self, req, join_data).await
    }

    pub async fn list_students(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, req, class_id).await
    }

    pub async fn remove_student(
        &self,
        req: &HttpRequest,
        class_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::remove_student(self, req, class_id, student_id).await
    }
}
