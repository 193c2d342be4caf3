use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::future::try_join_all;
use std::collections::HashMap;

use super::{DASHBOARD_LIST_LIMIT, DashboardService};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    cohorts::entities::CohortRole,
    dashboard::responses::{FacilitatorCohortSummary, FacilitatorDashboardResponse},
};
use crate::services::{storage_error_response, unauthorized_response};

pub async fn facilitator_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let cohorts = match storage
        .list_user_cohorts(user_id, Some(CohortRole::Facilitator))
        .await
    {
        Ok(cohorts) => cohorts,
        Err(e) => return Ok(storage_error_response(e, "Failed to load dashboard")),
    };
    let cohort_ids: Vec<i64> = cohorts.iter().map(|c| c.id).collect();

    let limit = DASHBOARD_LIST_LIMIT as u64;
    let student_counts = try_join_all(
        cohort_ids
            .iter()
            .map(|id| storage.count_cohort_members(*id, Some(CohortRole::Student))),
    );
    let (student_counts, assignments, pending_submissions, unanswered_posts) = match tokio::try_join!(
        student_counts,
        storage.list_assignments_by_cohorts(&cohort_ids),
        storage.list_ungraded_submissions(&cohort_ids, limit),
        storage.list_unanswered_posts(&cohort_ids, limit),
    ) {
        Ok(result) => result,
        Err(e) => return Ok(storage_error_response(e, "Failed to load dashboard")),
    };

    let mut assignment_counts: HashMap<i64, i64> = HashMap::new();
    for assignment in &assignments {
        *assignment_counts.entry(assignment.cohort_id).or_default() += 1;
    }

    let cohorts = cohorts
        .into_iter()
        .zip(student_counts)
        .map(|(cohort, student_count)| FacilitatorCohortSummary {
            assignment_count: assignment_counts.get(&cohort.id).copied().unwrap_or(0),
            student_count,
            cohort,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FacilitatorDashboardResponse {
            cohorts,
            pending_submissions,
            unanswered_posts,
        },
        "Dashboard retrieved successfully",
    )))
}
