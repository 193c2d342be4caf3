use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::{GamificationService, engine};
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    cohorts::entities::CohortRole,
    gamification::{
        requests::LeaderboardParams,
        responses::{LeaderboardEntry, LeaderboardResponse},
    },
    users::entities::{UserRole, UserSummary},
};
use crate::services::{
    access::CohortAccess, forbidden_response, storage_error_response, unauthorized_response,
};
use crate::storage::Storage;

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

/// 班期排行：该班期全部学员（含零分），使用各自的全部积分
async fn cohort_totals(storage: &dyn Storage, cohort_id: i64) -> Result<Vec<(i64, i64)>> {
    let members = storage
        .list_cohort_members(cohort_id, Some(CohortRole::Student))
        .await?;
    let ids: Vec<i64> = members.iter().map(|m| m.membership.user_id).collect();
    let sums: HashMap<i64, i64> = storage
        .sum_points_by_user(Some(&ids))
        .await?
        .into_iter()
        .collect();

    Ok(ids
        .into_iter()
        .map(|id| (id, sums.get(&id).copied().unwrap_or(0)))
        .collect())
}

/// 全局排行：有积分的学员账号
async fn global_totals(storage: &dyn Storage) -> Result<Vec<(i64, i64)>> {
    let sums = storage.sum_points_by_user(None).await?;
    let ids: Vec<i64> = sums.iter().map(|(id, _)| *id).collect();
    let students: std::collections::HashSet<i64> = storage
        .get_users_by_ids(&ids)
        .await?
        .into_iter()
        .filter(|u| u.role == UserRole::Student)
        .map(|u| u.id)
        .collect();

    Ok(sums
        .into_iter()
        .filter(|(id, _)| students.contains(id))
        .collect())
}

pub async fn leaderboard(
    service: &GamificationService,
    query: LeaderboardParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as usize;

    let totals = match query.cohort_id {
        Some(cohort_id) => {
            match storage.get_cohort_by_id(cohort_id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::CohortNotFound,
                        "Cohort not found",
                    )));
                }
                Err(e) => return Ok(storage_error_response(e, "Failed to load leaderboard")),
            }
            match CohortAccess::resolve(storage.as_ref(), &user, cohort_id).await {
                Ok(access) if access.can_view() => {}
                Ok(_) => return Ok(forbidden_response("No permission for this cohort")),
                Err(e) => return Ok(storage_error_response(e, "Failed to load leaderboard")),
            }
            cohort_totals(storage.as_ref(), cohort_id).await
        }
        None => global_totals(storage.as_ref()).await,
    };

    let totals = match totals {
        Ok(totals) => totals,
        Err(e) => return Ok(storage_error_response(e, "Failed to load leaderboard")),
    };

    let ranked = engine::rank_entries(totals, limit);
    let ids: Vec<i64> = ranked.iter().map(|(_, id, _)| *id).collect();
    let users: HashMap<i64, UserSummary> = match storage.get_users_by_ids(&ids).await {
        Ok(users) => users
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect(),
        Err(e) => return Ok(storage_error_response(e, "Failed to load leaderboard")),
    };

    let items = ranked
        .into_iter()
        .filter_map(|(rank, user_id, total_points)| {
            users.get(&user_id).cloned().map(|user| LeaderboardEntry {
                rank,
                user,
                total_points,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LeaderboardResponse {
            cohort_id: query.cohort_id,
            items,
        },
        "Leaderboard retrieved successfully",
    )))
}
