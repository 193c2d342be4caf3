use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    assignments::requests::{AssignmentListParams, AssignmentListQuery},
};
use crate::services::{
    access::{CohortAccess, visible_cohort_ids},
    forbidden_response, storage_error_response, unauthorized_response,
};

pub async fn list_assignments(
    service: &AssignmentService,
    query: AssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let cohort_ids = match query.cohort_id {
        Some(cohort_id) => {
            match CohortAccess::resolve(storage.as_ref(), &user, cohort_id).await {
                Ok(access) if access.can_view() => Some(vec![cohort_id]),
                Ok(_) => return Ok(forbidden_response("No permission for this cohort")),
                Err(e) => return Ok(storage_error_response(e, "Failed to list assignments")),
            }
        }
        None => match visible_cohort_ids(storage.as_ref(), &user).await {
            Ok(ids) => ids,
            Err(e) => return Ok(storage_error_response(e, "Failed to list assignments")),
        },
    };

    let (page, size) = query.pagination.normalized();
    let list_query = AssignmentListQuery {
        page,
        size,
        cohort_ids,
    };

    match storage.list_assignments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assignment list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to list assignments")),
    }
}
