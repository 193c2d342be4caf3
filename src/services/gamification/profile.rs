use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GamificationService, engine};
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, gamification::responses::GamificationProfile,
};
use crate::services::{storage_error_response, unauthorized_response};
use crate::storage::Storage;

/// 汇总积分流水和徽章，仪表盘也复用
pub async fn build_profile(storage: &dyn Storage, user_id: i64) -> Result<GamificationProfile> {
    let (events, badges) = tokio::try_join!(
        storage.list_point_events(user_id),
        storage.list_user_badges(user_id),
    )?;

    let total_points = events.iter().map(|e| i64::from(e.points)).sum();
    let today = chrono::Utc::now().date_naive();
    let (current_streak, longest_streak) =
        engine::compute_streaks(&engine::activity_days(&events), today);

    Ok(GamificationProfile {
        user_id,
        total_points,
        breakdown: engine::breakdown(&events),
        current_streak,
        longest_streak,
        badges,
    })
}

pub async fn my_profile(
    service: &GamificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    match build_profile(storage.as_ref(), user_id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            profile,
            "Gamification profile retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to load gamification profile")),
    }
}

pub async fn user_profile(
    service: &GamificationService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to load gamification profile")),
    }

    match build_profile(storage.as_ref(), user_id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            profile,
            "Gamification profile retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to load gamification profile")),
    }
}
