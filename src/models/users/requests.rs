use super::entities::UserRole;

/// 写入数据库前的用户数据，`password_hash` 已经过 argon2 处理
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub school_name: Option<String>,
}
