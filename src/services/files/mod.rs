pub mod course_files;
pub mod images;
pub mod receive;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::config::AppConfig;
use crate::models::files::{CourseFile, ImageUploadQuery};
use crate::storage::Storage;
use crate::utils::SafeUploadPath;

/// 课程附件所在的子目录
pub(crate) const COURSE_FILES_DIR: &str = "course_files";

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
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

    // 上传课程附件
    pub async fn upload_course_file(
        &self,
        request: &HttpRequest,
        course_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        course_files::upload_course_file(self, request, course_id, payload).await
    }

    // 下载课程附件
    pub async fn download_course_file(
        &self,
        request: &HttpRequest,
        course_id: i64,
        file_id: i64,
    ) -> ActixResult<HttpResponse> {
        course_files::download_course_file(self, request, course_id, file_id).await
    }

    pub async fn delete_course_file(
        &self,
        request: &HttpRequest,
        course_id: i64,
        file_id: i64,
    ) -> ActixResult<HttpResponse> {
        course_files::delete_course_file(self, request, course_id, file_id).await
    }

    // 上传练习图片
    pub async fn upload_exercise_image(
        &self,
        request: &HttpRequest,
        query: ImageUploadQuery,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        images::upload_exercise_image(request, query, payload).await
    }

    // 读取已上传的练习图片
    pub async fn serve_upload(&self, path: SafeUploadPath) -> ActixResult<HttpResponse> {
        images::serve_upload(path).await
    }
}

pub(crate) fn course_file_path(config: &AppConfig, stored_name: &str) -> PathBuf {
    PathBuf::from(&config.upload.dir)
        .join(COURSE_FILES_DIR)
        .join(stored_name)
}

/// 删除附件在磁盘上的文件，失败只记录日志
pub(crate) fn remove_stored_files(files: &[CourseFile]) {
    let config = AppConfig::get();
    for file in files {
        let path = course_file_path(config, &file.stored_name);
        if let Err(e) = std::fs::remove_file(&path) {
            warn!("Failed to remove course file {}: {}", path.display(), e);
        }
    }
}
