use crate::models::users::User;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// access token 有效期（秒）
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}
