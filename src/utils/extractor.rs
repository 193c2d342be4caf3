//! 路径参数安全提取器
//!
//! 路径中的 ID 解析失败时直接返回统一格式的 400 响应，而不是 actix 默认的 404。

use actix_web::{HttpRequest, HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// 解析正整数 ID
pub fn parse_positive_i64(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// 定义一个从指定路径参数中提取 i64 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready(
                    $crate::utils::extractor::extract_i64_param(req, $param).map($name),
                )
            }
        }
    };
}

pub fn extract_i64_param(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param).unwrap_or_default();
    parse_positive_i64(raw).ok_or_else(|| {
        let message = format!("Invalid path parameter '{param}': {raw}");
        let response =
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
        InternalError::from_response(message, response).into()
    })
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeCohortIdI64, "cohort_id");
define_safe_i64_extractor!(SafeUserIdI64, "user_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_i64() {
        assert_eq!(parse_positive_i64("42"), Some(42));
        assert_eq!(parse_positive_i64("0"), None);
        assert_eq!(parse_positive_i64("-3"), None);
        assert_eq!(parse_positive_i64("abc"), None);
        assert_eq!(parse_positive_i64(""), None);
    }
}
