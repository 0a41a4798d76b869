use serde::Deserialize;
use ts_rs::TS;

use crate::models::users::UserRole;

// 登录请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

// 注册请求，仅允许 student 与 teacher
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    /// 学生所在学校
    pub school_name: Option<String>,
}
