use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_with_access};
use crate::errors::SkillLinkError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::requests::SubmitAssignmentRequest,
    gamification::entities::PointSource,
    submissions::{entities::NewSubmission, responses::SubmitResponse},
};
use crate::services::{
    forbidden_response, gamification::award_points, storage_error_response,
    unauthorized_response,
};
use crate::utils::validate::validate_external_url;

pub async fn submit_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    submit_data: SubmitAssignmentRequest,
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
        "Failed to submit assignment",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    if !access.is_student() {
        return Ok(forbidden_response(
            "Only student members of the cohort can submit",
        ));
    }

    let content = submit_data.content.trim().to_string();
    if content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubmissionContentEmpty,
            "Submission content must not be empty",
        )));
    }

    let attachment_url = submit_data
        .attachment_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    if let Some(url) = &attachment_url
        && let Err(msg) = validate_external_url(url)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let is_late = assignment.is_past_due(chrono::Utc::now());
    let new_submission = NewSubmission {
        assignment_id,
        student_id: user.id,
        content,
        attachment_url,
        is_late,
    };

    let submission = match storage.create_submission(new_submission).await {
        Ok(submission) => submission,
        Err(SkillLinkError::Conflict(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubmissionAlreadyExists,
                "You have already submitted this assignment",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to submit assignment")),
    };

    let cohort_id = Some(assignment.cohort_id);
    let mut points_awarded = award_points(
        storage.as_ref(),
        user.id,
        cohort_id,
        PointSource::Submission,
        submission.id,
    )
    .await;
    if !is_late {
        points_awarded += award_points(
            storage.as_ref(),
            user.id,
            cohort_id,
            PointSource::OnTimeBonus,
            submission.id,
        )
        .await;
    }

    tracing::info!(
        "User {} submitted assignment {} (late: {})",
        user.id,
        assignment_id,
        is_late
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        SubmitResponse {
            submission,
            points_awarded,
        },
        "Assignment submitted successfully",
    )))
}
