use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_with_access};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, assignments::responses::AssignmentDetailResponse};
use crate::services::{forbidden_response, storage_error_response, unauthorized_response};

pub async fn get_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (assignment, access) = match load_with_access(
        storage.as_ref(),
        &user,
        assignment_id,
        "Failed to get assignment",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    if !access.can_view() {
        return Ok(forbidden_response("No permission for this cohort"));
    }

    // 学员附带自己的提交
    let my_submission = if access.is_student() {
        match storage
            .get_submission_by_assignment_and_student(assignment.id, user.id)
            .await
        {
            Ok(submission) => submission,
            Err(e) => return Ok(storage_error_response(e, "Failed to get assignment")),
        }
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment,
            my_submission,
        },
        "Assignment retrieved successfully",
    )))
}
