use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, detail::load_submission};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, submissions::requests::GradeSubmissionRequest};
use crate::services::{forbidden_response, storage_error_response, unauthorized_response};

/// 分数需在 0..=max_score 之间
pub(crate) fn validate_score(score: f64, max_score: f64) -> Result<(), String> {
    if !score.is_finite() || score < 0.0 || score > max_score {
        return Err(format!("Score must be between 0 and {max_score}"));
    }
    Ok(())
}

pub async fn grade_submission(
    service: &SubmissionService,
    submission_id: i64,
    grade_data: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (_, assignment, access) = match load_submission(
        storage.as_ref(),
        &user,
        submission_id,
        "Failed to grade submission",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    if !access.can_manage() {
        return Ok(forbidden_response(
            "Only cohort facilitators can grade submissions",
        ));
    }

    if let Err(msg) = validate_score(grade_data.score, assignment.max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeOutOfRange, msg)));
    }

    let feedback = grade_data
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    match storage
        .grade_submission(submission_id, grade_data.score, feedback, user.id)
        .await
    {
        Ok(Some(submission)) => {
            tracing::info!(
                "Submission {} graded {} by user {}",
                submission_id,
                grade_data.score,
                user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission graded successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to grade submission")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score(0.0, 100.0).is_ok());
        assert!(validate_score(100.0, 100.0).is_ok());
        assert!(validate_score(55.5, 100.0).is_ok());
        assert!(validate_score(-0.5, 100.0).is_err());
        assert!(validate_score(100.5, 100.0).is_err());
        assert!(validate_score(f64::INFINITY, 100.0).is_err());
    }
}
