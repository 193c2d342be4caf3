use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CohortService;
use crate::errors::SkillLinkError;
use crate::models::{
    ApiResponse, ErrorCode,
    cohorts::{requests::AddMemberRequest, responses::CohortMemberListResponse},
};
use crate::services::storage_error_response;

pub async fn list_members(
    service: &CohortService,
    cohort_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_cohort_by_id(cohort_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CohortNotFound,
                "Cohort not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to list cohort members")),
    }

    match storage.list_cohort_members(cohort_id, None).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CohortMemberListResponse { items },
            "Cohort members retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to list cohort members")),
    }
}

pub async fn add_member(
    service: &CohortService,
    cohort_id: i64,
    member_data: AddMemberRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 班期存在
    match storage.get_cohort_by_id(cohort_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CohortNotFound,
                "Cohort not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to add cohort member")),
    }

    // 2. 用户存在且角色匹配
    let user = match storage.get_user_by_id(member_data.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to add cohort member")),
    };

    if !member_data.role.is_compatible_with(user.role) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CohortRoleMismatch,
            format!(
                "A {} account cannot join a cohort as {}",
                user.role, member_data.role
            ),
        )));
    }

    // 3. 重复加入由唯一索引返回冲突
    match storage
        .add_cohort_member(cohort_id, user.id, member_data.role)
        .await
    {
        Ok(membership) => {
            tracing::info!(
                "User {} joined cohort {} as {}",
                user.id,
                cohort_id,
                membership.role
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                membership,
                "Member added successfully",
            )))
        }
        Err(SkillLinkError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::CohortMemberExists,
                "User is already a member of this cohort",
            ),
        )),
        Err(e) => Ok(storage_error_response(e, "Failed to add cohort member")),
    }
}

pub async fn remove_member(
    service: &CohortService,
    cohort_id: i64,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.remove_cohort_member(cohort_id, user_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Member removed successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CohortMemberNotFound,
            "Member not found in this cohort",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to remove cohort member")),
    }
}
