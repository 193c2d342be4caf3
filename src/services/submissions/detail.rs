use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, assignments::entities::Assignment, submissions::entities::Submission,
    users::entities::User,
};
use crate::services::{
    access::CohortAccess, forbidden_response, storage_error_response, unauthorized_response,
};
use crate::storage::Storage;

/// 取出提交及当前用户对其所属班期的身份
pub(crate) async fn load_submission(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
    context: &str,
) -> Result<(Submission, Assignment, CohortAccess), HttpResponse> {
    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => return Err(storage_error_response(e, context)),
    };

    let assignment = match storage.get_assignment_by_id(submission.assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Err(storage_error_response(e, context)),
    };

    match CohortAccess::resolve(storage, user, assignment.cohort_id).await {
        Ok(access) => Ok((submission, assignment, access)),
        Err(e) => Err(storage_error_response(e, context)),
    }
}

pub async fn get_submission(
    service: &SubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (submission, _, access) = match load_submission(
        storage.as_ref(),
        &user,
        submission_id,
        "Failed to get submission",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    // 提交者本人或班期管理者
    if submission.student_id != user.id && !access.can_manage() {
        return Ok(forbidden_response("No permission to view this submission"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission retrieved successfully",
    )))
}
