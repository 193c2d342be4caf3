use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CohortService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

// 成员资格已由 RequireCohortRole 校验
pub async fn get_cohort(
    service: &CohortService,
    cohort_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_cohort_by_id(cohort_id).await {
        Ok(Some(cohort)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            cohort,
            "Cohort information retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CohortNotFound,
            "Cohort not found",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to get cohort information")),
    }
}
