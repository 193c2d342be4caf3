use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Token 类型
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

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
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

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// refresh token 有效期（秒），用于设置 cookie
    pub refresh_expires_in: i64,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// access token 有效期
    pub fn access_token_ttl() -> chrono::Duration {
        chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    /// refresh token 有效期，勾选“记住我”时使用更长的有效期
    pub fn refresh_token_ttl(remember_me: bool) -> chrono::Duration {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            chrono::Duration::days(jwt.refresh_token_remember_me_expiry)
        } else {
            chrono::Duration::days(jwt.refresh_token_expiry)
        }
    }

    pub fn generate_token(
        user_id: i64,
        role: &str,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::encode_with_secret(Self::secret(), user_id, role, kind, ttl)
    }

    fn encode_with_secret(
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

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::generate_token(user_id, role, TokenKind::Access, Self::access_token_ttl())
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        remember_me: bool,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let refresh_ttl = Self::refresh_token_ttl(remember_me);
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_token(user_id, role, TokenKind::Refresh, refresh_ttl)?,
            refresh_expires_in: refresh_ttl.num_seconds(),
        })
    }

    fn decode_with_secret(
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

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(Self::secret(), token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(Self::secret(), token, TokenKind::Refresh)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(refresh_token: &str, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(max_age_secs))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::create_refresh_token_cookie("", 0)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_kind_is_enforced() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            7,
            "student",
            TokenKind::Refresh,
            chrono::Duration::minutes(5),
        )
        .unwrap();

        let claims = JwtUtils::decode_with_secret(SECRET, &token, TokenKind::Refresh).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.role, "student");

        assert!(JwtUtils::decode_with_secret(SECRET, &token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "admin",
            TokenKind::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret("other", &token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "admin",
            TokenKind::Access,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret(SECRET, &token, TokenKind::Access).is_err());
    }
}
