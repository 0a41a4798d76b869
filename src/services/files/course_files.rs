use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::receive::receive_single_file;
use super::{COURSE_FILES_DIR, FileService, course_file_path, remove_stored_files};
use crate::config::AppConfig;
use crate::errors::ClassNumError;
use crate::models::files::{CourseFile, CourseFileUploadResponse, NewCourseFile};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, not_found, require_course_member, require_course_owner, storage_failure,
};
use crate::storage::Storage;

pub async fn upload_course_file(
    service: &FileService,
    request: &HttpRequest,
    course_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 先鉴权再接收文件
    if let Err(resp) = require_course_owner(&storage, &user, course_id).await {
        return Ok(resp);
    }

    let config = AppConfig::get();
    let target_dir = PathBuf::from(&config.upload.dir).join(COURSE_FILES_DIR);
    let received = match receive_single_file(
        &mut payload,
        &target_dir,
        &config.upload.document_extensions,
        config.upload.max_size,
    )
    .await
    {
        Ok(received) => received,
        Err(resp) => return Ok(resp),
    };

    let new_file = NewCourseFile {
        course_id,
        uploaded_by: user.id,
        original_name: received.original_name.clone(),
        stored_name: received.stored_name.clone(),
        content_type: received.content_type.clone(),
        file_size: received.size,
    };

    match storage.create_course_file(new_file).await {
        Ok(file) => {
            info!(
                "File {} ({} bytes) uploaded to course {}",
                file.original_name, file.file_size, course_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CourseFileUploadResponse { file },
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            // 未登记的文件不保留
            let _ = std::fs::remove_file(&received.path);
            Ok(storage_failure("Failed to register course file", e))
        }
    }
}

pub async fn download_course_file(
    service: &FileService,
    request: &HttpRequest,
    course_id: i64,
    file_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_course_member(&storage, &user, course_id).await {
        return Ok(resp);
    }

    let file = match load_course_file(&storage, course_id, file_id).await {
        Ok(file) => file,
        Err(resp) => return Ok(resp),
    };

    let path = course_file_path(AppConfig::get(), &file.stored_name);
    let buf = match std::fs::read(&path) {
        Ok(buf) => buf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Course file {} missing on disk: {}", file.id, path.display());
            return Ok(not_found(ErrorCode::FileNotFound, "File not found"));
        }
        Err(e) => {
            error!("{}", ClassNumError::file_operation(format!("{e}")));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    // 使用数据库中的原始文件名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.content_type.clone()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                file.original_name.replace(['"', '\\', '\r', '\n'], "_")
            ),
        ))
        .body(buf))
}

pub async fn delete_course_file(
    service: &FileService,
    request: &HttpRequest,
    course_id: i64,
    file_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_course_owner(&storage, &user, course_id).await {
        return Ok(resp);
    }

    let file = match load_course_file(&storage, course_id, file_id).await {
        Ok(file) => file,
        Err(resp) => return Ok(resp),
    };

    match storage.delete_course_file(file_id).await {
        Ok(true) => {
            remove_stored_files(std::slice::from_ref(&file));
            info!("File {} deleted from course {}", file_id, course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("File deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::FileNotFound, "File not found")),
        Err(e) => Ok(storage_failure("Failed to delete course file", e)),
    }
}

/// 附件必须属于路径中的课程
async fn load_course_file(
    storage: &std::sync::Arc<dyn Storage>,
    course_id: i64,
    file_id: i64,
) -> Result<CourseFile, HttpResponse> {
    match storage.get_course_file_by_id(file_id).await {
        Ok(Some(file)) if file.course_id == course_id => Ok(file),
        Ok(_) => Err(not_found(ErrorCode::FileNotFound, "File not found")),
        Err(e) => Err(storage_failure("Failed to load course file", e)),
    }
}
