use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CohortService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    cohorts::requests::{CohortListParams, CohortListQuery},
};
use crate::services::{storage_error_response, unauthorized_response};

pub async fn list_cohorts(
    service: &CohortService,
    query: CohortListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (page, size) = query.pagination.normalized();
    let list_query = CohortListQuery {
        page,
        size,
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        status: query.status,
        member_id: (!user.is_admin()).then_some(user.id),
    };

    match storage.list_cohorts_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Cohort list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to retrieve cohort list")),
    }
}
