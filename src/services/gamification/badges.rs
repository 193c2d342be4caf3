use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use regex::Regex;

use super::GamificationService;
use crate::errors::SkillLinkError;
use crate::models::{
    ApiResponse, ErrorCode,
    gamification::{
        entities::NewBadge, requests::CreateBadgeRequest, responses::BadgeListResponse,
    },
};
use crate::services::storage_error_response;
use crate::utils::validate::validate_title;

static BADGE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]{2,50}$").expect("Invalid badge code regex"));

pub async fn list_badges(
    service: &GamificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_badges().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BadgeListResponse { items },
            "Badges retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to list badges")),
    }
}

pub async fn create_badge(
    service: &GamificationService,
    badge_data: CreateBadgeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let code = badge_data.code.trim().to_lowercase();
    if !BADGE_CODE_RE.is_match(&code) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadgeInvalid,
            "Badge code must be 2-50 lowercase letters, digits or underscores",
        )));
    }
    let name = match validate_title(&badge_data.name, 100) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadgeInvalid, msg)));
        }
    };
    if badge_data.threshold < 1 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadgeInvalid,
            "Badge threshold must be at least 1",
        )));
    }

    let new_badge = NewBadge {
        code,
        name,
        description: badge_data.description,
        icon: badge_data.icon,
        criterion: badge_data.criterion,
        threshold: badge_data.threshold,
    };

    match storage.create_badge(new_badge).await {
        Ok(badge) => {
            tracing::info!("Badge {} created", badge.code);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(badge, "Badge created successfully")))
        }
        Err(SkillLinkError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::BadgeAlreadyExists, "Badge code already exists"),
        )),
        Err(e) => Ok(storage_error_response(e, "Failed to create badge")),
    }
}
