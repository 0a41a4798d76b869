//! 路径参数提取器
//!
//! 非数字或非正数的 ID 直接以统一响应格式返回 400。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

fn parse_positive_id(req: &HttpRequest, param: &str, label: &str) -> Result<i64, actix_web::Error> {
    match req.match_info().get(param).map(|v| v.parse::<i64>()) {
        Some(Ok(id)) if id > 0 => Ok(id),
        _ => Err(bad_request(format!("Invalid {label}"))),
    }
}

macro_rules! define_safe_id {
    ($($name:ident($param:literal, $label:literal)),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param, $label).map($name))
                }
            }
        )*
    };
}

define_safe_id! {
    SafeIDI64("id", "id"),
    SafeClassIdI64("class_id", "class id"),
    SafeCourseIdI64("course_id", "course id"),
    SafeExerciseIdI64("exercise_id", "exercise id"),
    SafeAttemptIdI64("attempt_id", "attempt id"),
    SafeFileIdI64("file_id", "file id"),
    SafeStudentIdI64("student_id", "student id"),
}

/// 上传文件路径 `/uploads/{category}/{name}`，拒绝目录穿越
#[derive(Debug, Clone)]
pub struct SafeUploadPath {
    pub category: String,
    pub name: String,
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromRequest for SafeUploadPath {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let info = req.match_info();
        let result = match (info.get("category"), info.get("name")) {
            (Some(category), Some(name)) if is_safe_segment(category) && is_safe_segment(name) => {
                Ok(SafeUploadPath {
                    category: category.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(bad_request("Invalid file path".to_string())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default()
            .param("exercise_id", "12")
            .to_http_request();
        let id = SafeExerciseIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 12);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_invalid() {
        for raw in ["0", "-3", "abc", ""] {
            let req = TestRequest::default().param("class_id", raw).to_http_request();
            assert!(SafeClassIdI64::extract(&req).await.is_err(), "{raw}");
        }
    }

    #[test]
    fn test_upload_segments() {
        assert!(is_safe_segment("1700000000-abc.png"));
        assert!(is_safe_segment("image_labeling"));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("a/b"));
        assert!(!is_safe_segment(""));
    }
}
