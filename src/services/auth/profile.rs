use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::SkillLinkError;
use crate::middlewares::RequireJWT;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{storage_error_response, unauthorized_response};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_email, validate_external_url, validate_password_simple};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(current_user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    // 邮箱格式与唯一性
    let email = update_data.email.map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        if let Err(msg) = validate_email(email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        match storage.get_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != current_user.id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_error_response(e, "Failed to update profile")),
        }
    }

    if let Some(ref avatar_url) = update_data.avatar_url
        && let Err(msg) = validate_external_url(avatar_url)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 修改密码需要校验当前密码
    let hashed_password = match update_data.password {
        Some(ref password) => {
            // 缓存中的用户不带密码哈希，重新读取
            let stored = match storage.get_user_by_id(current_user.id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::UserNotFound,
                        "User not found",
                    )));
                }
                Err(e) => return Ok(storage_error_response(e, "Failed to update profile")),
            };
            let current_ok = update_data
                .current_password
                .as_deref()
                .is_some_and(|current| verify_password(current, &stored.password_hash));
            if !current_ok {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserPasswordInvalid,
                    "Current password is incorrect",
                )));
            }
            if let Err(msg) = validate_password_simple(password) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
            }
            match hash_password(password) {
                Ok(hash) => Some(hash),
                Err(e) => return Ok(storage_error_response(e, "Password hashing failed")),
            }
        }
        None => None,
    };

    // 不允许修改角色和状态
    let storage_update = UpdateUserRequest {
        email,
        password: hashed_password,
        role: None,
        status: None,
        display_name: update_data.display_name,
        avatar_url: update_data.avatar_url,
    };

    let result = storage.update_user(current_user.id, storage_update).await;
    RequireJWT::evict_user(request, current_user.id).await;

    match result {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Profile updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(SkillLinkError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "Email already exists"),
        )),
        Err(e) => Ok(storage_error_response(e, "Failed to update profile")),
    }
}
