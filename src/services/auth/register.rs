use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::SkillLinkError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::{
        entities::UserRole, requests::CreateUserRequest, responses::UserResponse,
    },
};
use crate::services::storage_error_response;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    // 1. 格式校验
    if let Err(msg) = validate_username(&username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    // 2. 唯一性
    if let Err(response) = check_username_exists(&storage, &username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Register failed, unable to hash password",
                )),
            );
        }
    };

    // 3. 自助注册固定为学员
    let create_request = CreateUserRequest {
        username,
        email,
        password: password_hash,
        role: UserRole::Student,
        display_name: register_request.display_name,
        avatar_url: None,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("New student registered: {} (ID: {})", user.username, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Registered successfully",
            )))
        }
        // 并发注册时由唯一索引兜底
        Err(SkillLinkError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "User already exists"),
        )),
        Err(e) => Ok(storage_error_response(e, "Register failed")),
    }
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(storage_error_response(e, "Register failed")),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(storage_error_response(e, "Register failed")),
    }
}
