//! multipart 单文件接收
//!
//! 边接收边写盘：首个数据块校验文件头，累计大小超过上限即中止，
//! 任何失败都会删除已写入的部分文件。

use actix_multipart::Multipart;
use actix_web::{HttpResponse, http::StatusCode};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::error;
use uuid::Uuid;

use crate::errors::ClassNumError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate_magic_bytes;

/// 已落盘的上传文件
#[derive(Debug, Clone)]
pub(crate) struct ReceivedFile {
    pub original_name: String,
    pub stored_name: String,
    pub content_type: String,
    pub size: i64,
    pub path: PathBuf,
}

fn reject(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

fn discard(path: &Path) {
    let _ = fs::remove_file(path);
}

/// 小写扩展名（不含点）
pub(crate) fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .filter(|ext| !ext.is_empty())
}

pub(crate) fn is_extension_allowed(extension: &str, allowed: &[String]) -> bool {
    allowed
        .iter()
        .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(extension))
}

/// 接收表单中名为 `file` 的唯一文件，保存到 `target_dir`
pub(crate) async fn receive_single_file(
    payload: &mut Multipart,
    target_dir: &Path,
    allowed_extensions: &[String],
    max_size: usize,
) -> Result<ReceivedFile, HttpResponse> {
    if let Err(e) = fs::create_dir_all(target_dir) {
        error!(
            "{}",
            ClassNumError::file_operation(format!("{}: {e}", target_dir.display()))
        );
        return Err(reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::FileUploadFailed,
            "Failed to prepare upload directory",
        ));
    }

    let mut received: Option<ReceivedFile> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        // 其余表单字段忽略
        if name != "file" {
            continue;
        }

        if let Some(previous) = &received {
            discard(&previous.path);
            return Err(reject(
                StatusCode::BAD_REQUEST,
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        let original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = match extension_of(&original_name) {
            Some(ext) if is_extension_allowed(&ext, allowed_extensions) => ext,
            _ => {
                return Err(reject(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::FileTypeNotAllowed,
                    "File type not allowed",
                ));
            }
        };

        // MIME 类型只用于记录，不用于校验
        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let stored_name = format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp(),
            Uuid::new_v4(),
            extension
        );
        let path = target_dir.join(&stored_name);

        let mut file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                error!("{}", ClassNumError::file_operation(format!("{e}")));
                return Err(reject(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::FileUploadFailed,
                    "Failed to create file",
                ));
            }
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    discard(&path);
                    error!("Upload stream interrupted: {}", e);
                    return Err(reject(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::FileUploadFailed,
                        "Upload interrupted",
                    ));
                }
            };

            // 第一个 chunk 时验证魔术字节
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    discard(&path);
                    return Err(reject(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                discard(&path);
                return Err(reject(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }

            if let Err(e) = file.write_all(&data) {
                discard(&path);
                error!("{}", ClassNumError::file_operation(format!("{e}")));
                return Err(reject(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::FileUploadFailed,
                    "Failed to write file",
                ));
            }
        }

        if total_size == 0 {
            discard(&path);
            return Err(reject(
                StatusCode::BAD_REQUEST,
                ErrorCode::FileUploadFailed,
                "Uploaded file is empty",
            ));
        }

        received = Some(ReceivedFile {
            original_name,
            stored_name,
            content_type,
            size: total_size as i64,
            path,
        });
    }

    received.ok_or_else(|| {
        reject(
            StatusCode::BAD_REQUEST,
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Carte.PNG").as_deref(), Some("png"));
        assert_eq!(extension_of("cours.v2.pdf").as_deref(), Some("pdf"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(""), None);
    }

    #[test]
    fn test_is_extension_allowed() {
        let allowed = vec!["png".to_string(), ".JPG".to_string()];
        assert!(is_extension_allowed("png", &allowed));
        assert!(is_extension_allowed("jpg", &allowed));
        assert!(!is_extension_allowed("exe", &allowed));
    }
}
