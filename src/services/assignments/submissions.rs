use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_with_access};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, submissions::responses::SubmissionListResponse};
use crate::services::{forbidden_response, storage_error_response, unauthorized_response};

pub async fn list_submissions(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (_, access) = match load_with_access(
        storage.as_ref(),
        &user,
        assignment_id,
        "Failed to list submissions",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    if !access.can_manage() {
        return Ok(forbidden_response(
            "Only cohort facilitators can view all submissions",
        ));
    }

    match storage.list_submissions_by_assignment(assignment_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse { items },
            "Submission list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to list submissions")),
    }
}
