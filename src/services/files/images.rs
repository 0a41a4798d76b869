use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::PathBuf;
use tracing::{error, info};

use super::receive::{extension_of, receive_single_file};
use crate::config::AppConfig;
use crate::errors::ClassNumError;
use crate::models::files::{ImageUploadQuery, ImageUploadResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::ExerciseType;
use crate::services::access::{current_user, not_found};
use crate::utils::SafeUploadPath;

pub async fn upload_exercise_image(
    request: &HttpRequest,
    query: ImageUploadQuery,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 目录名只取规范化后的练习类型
    let exercise_type = match query.exercise_type.parse::<ExerciseType>() {
        Ok(t) => t,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ExerciseTypeUnsupported,
                e.message(),
            )));
        }
    };

    let config = AppConfig::get();
    let target_dir = PathBuf::from(&config.upload.dir).join(exercise_type.as_str());
    let received = match receive_single_file(
        &mut payload,
        &target_dir,
        &config.upload.image_extensions,
        config.upload.max_size,
    )
    .await
    {
        Ok(received) => received,
        Err(resp) => return Ok(resp),
    };

    info!(
        "Image {} uploaded for {} by {}",
        received.stored_name, exercise_type, user.username
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        ImageUploadResponse {
            path: public_path(exercise_type, &received.stored_name),
            file_name: received.stored_name,
            size: received.size,
        },
        "Image uploaded successfully",
    )))
}

pub async fn serve_upload(path: SafeUploadPath) -> ActixResult<HttpResponse> {
    // 只开放练习图片目录，课程附件需走鉴权下载
    let exercise_type = match path.category.parse::<ExerciseType>() {
        Ok(t) if t.as_str() == path.category => t,
        _ => return Ok(not_found(ErrorCode::FileNotFound, "File not found")),
    };

    let file_path = PathBuf::from(&AppConfig::get().upload.dir)
        .join(exercise_type.as_str())
        .join(&path.name);

    match std::fs::read(&file_path) {
        Ok(buf) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, image_content_type(&path.name)))
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
            .body(buf)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(not_found(ErrorCode::FileNotFound, "File not found"))
        }
        Err(e) => {
            error!("{}", ClassNumError::file_operation(format!("{e}")));
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            )
        }
    }
}

fn public_path(exercise_type: ExerciseType, stored_name: &str) -> String {
    format!("/uploads/{}/{}", exercise_type.as_str(), stored_name)
}

fn image_content_type(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_path() {
        assert_eq!(
            public_path(ExerciseType::ImageLabeling, "1700000000-abc.png"),
            "/uploads/image_labeling/1700000000-abc.png"
        );
    }

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type("a.PNG"), "image/png");
        assert_eq!(image_content_type("a.jpeg"), "image/jpeg");
        assert_eq!(image_content_type("a.webp"), "image/webp");
        assert_eq!(image_content_type("a.svg"), "application/octet-stream");
    }
}
