use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户ID
    pub role: String,       // 用户角色
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    /// access token 有效期
    pub fn access_token_ttl() -> chrono::Duration {
        chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    /// refresh token 有效期，记住我时使用更长的期限
    pub fn refresh_token_ttl(remember_me: bool) -> chrono::Duration {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            chrono::Duration::days(jwt.refresh_token_remember_me_expiry)
        } else {
            chrono::Duration::days(jwt.refresh_token_expiry)
        }
    }

    pub fn encode_with_secret(
        secret: &str,
        user_id: i64,
        role: &str,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind.as_str().to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn decode_with_secret(
        secret: &str,
        token: &str,
        kind: TokenKind,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != kind.as_str() {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        remember_me: bool,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let secret = Self::secret();
        Ok(TokenPair {
            access_token: Self::encode_with_secret(
                &secret,
                user_id,
                role,
                TokenKind::Access,
                Self::access_token_ttl(),
            )?,
            refresh_token: Self::encode_with_secret(
                &secret,
                user_id,
                role,
                TokenKind::Refresh,
                Self::refresh_token_ttl(remember_me),
            )?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(&Self::secret(), token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(&Self::secret(), token, TokenKind::Refresh)
    }

    /// 用 refresh token 换取新的 access token
    pub fn refresh_access_token(
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let user_id = claims
            .user_id()
            .ok_or(jsonwebtoken::errors::ErrorKind::InvalidToken)?;
        Self::encode_with_secret(
            &Self::secret(),
            user_id,
            &claims.role,
            TokenKind::Access,
            Self::access_token_ttl(),
        )
    }

    /// refresh token 的 HttpOnly Cookie
    pub fn create_refresh_token_cookie(refresh_token: &str, remember_me: bool) -> Cookie<'static> {
        let max_age = Self::refresh_token_ttl(remember_me).num_seconds();
        Cookie::build(REFRESH_COOKIE_NAME, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(max_age))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 过期的空 Cookie，用于登出或 refresh token 失效时清除客户端状态
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_encode_decode_access_token() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            42,
            "teacher",
            TokenKind::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        let claims = JwtUtils::decode_with_secret(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_token_kind_mismatch_rejected() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "student",
            TokenKind::Refresh,
            chrono::Duration::days(1),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret(SECRET, &token, TokenKind::Access).is_err());
        assert!(JwtUtils::decode_with_secret("other", &token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "student",
            TokenKind::Access,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret(SECRET, &token, TokenKind::Access).is_err());
    }
}
