use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnalyticsService, compute};
use crate::models::{ApiResponse, analytics::responses::PlatformOverviewResponse};
use crate::services::storage_error_response;

pub async fn platform_overview(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let (users, cohorts, assignments, (submissions, graded), expected) = match tokio::try_join!(
        storage.count_users_by_role(),
        storage.count_cohorts(),
        storage.count_assignments(),
        storage.count_submissions(),
        storage.count_expected_submissions(),
    ) {
        Ok(result) => result,
        Err(e) => return Ok(storage_error_response(e, "Failed to load platform overview")),
    };

    let response = PlatformOverviewResponse {
        users,
        cohorts: cohorts as i64,
        assignments: assignments as i64,
        submissions: submissions as i64,
        graded_submissions: graded as i64,
        completion_rate: compute::completion_rate(submissions, expected),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Platform overview retrieved successfully",
    )))
}
