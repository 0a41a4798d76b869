//! 数据模型
//!
//! 领域模型、请求体与响应体，均派生 `ts_rs::TS` 以导出前端类型。

pub mod attempts;
pub mod auth;
pub mod classes;
pub mod common;
pub mod courses;
pub mod exercises;
pub mod files;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 业务错误码
///
/// 0 成功，1xxx 通用，2xxx 认证，3xxx 文件，4xxx 用户，5xxx 班级，6xxx 课程，7xxx 练习，8xxx 作答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,
    RefreshTokenInvalid = 2002,

    // 文件
    FileNotFound = 3000,
    FileUploadFailed = 3001,
    FileTypeNotAllowed = 3002,
    FileSizeExceeded = 3003,
    MultifileUploadNotAllowed = 3004,

    // 用户
    UserNotFound = 4000,
    UserNameInvalid = 4001,
    UserEmailInvalid = 4002,
    UserPasswordInvalid = 4003,
    UserNameAlreadyExists = 4004,
    UserEmailAlreadyExists = 4005,

    // 班级
    ClassNotFound = 5000,
    ClassCreationFailed = 5001,
    ClassPermissionDenied = 5002,
    ClassAccessCodeInvalid = 5003,
    ClassAlreadyJoined = 5004,
    ClassStudentNotFound = 5005,

    // 课程
    CourseNotFound = 6000,
    CoursePermissionDenied = 6001,
    CourseExerciseAlreadyAttached = 6002,
    CourseExerciseNotAttached = 6003,

    // 练习
    ExerciseNotFound = 7000,
    ExerciseContentInvalid = 7001,
    ExerciseTypeUnsupported = 7002,
    ExercisePermissionDenied = 7003,

    // 作答
    AttemptNotFound = 8000,
    AttemptLimitReached = 8001,
    AttemptNotEnrolled = 8002,
    AttemptUngradable = 8003,
}

/// 应用启动时间
#[derive(Debug, Clone, Copy)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AuthFailed as i32 / 1000, 2);
        assert_eq!(ErrorCode::FileTypeNotAllowed as i32 / 1000, 3);
        assert_eq!(ErrorCode::ClassAlreadyJoined as i32 / 1000, 5);
        assert_eq!(ErrorCode::CourseNotFound as i32 / 1000, 6);
        assert_eq!(ErrorCode::ExerciseContentInvalid as i32 / 1000, 7);
        assert_eq!(ErrorCode::AttemptLimitReached as i32 / 1000, 8);
    }
}
