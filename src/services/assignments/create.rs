use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, validate_max_score};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, assignments::requests::CreateAssignmentRequest};
use crate::services::{
    access::CohortAccess, forbidden_response, storage_error_response, unauthorized_response,
};
use crate::utils::validate::validate_title;

pub async fn create_assignment(
    service: &AssignmentService,
    mut assignment_data: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    match storage.get_cohort_by_id(assignment_data.cohort_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CohortNotFound,
                "Cohort not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to create assignment")),
    }

    match CohortAccess::resolve(storage.as_ref(), &user, assignment_data.cohort_id).await {
        Ok(access) if access.can_manage() => {}
        Ok(_) => {
            return Ok(forbidden_response(
                "Only cohort facilitators can create assignments",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to create assignment")),
    }

    assignment_data.title = match validate_title(&assignment_data.title, 200) {
        Ok(title) => title,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
        }
    };
    if let Err(msg) = validate_max_score(assignment_data.max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    match storage.create_assignment(user.id, assignment_data).await {
        Ok(assignment) => {
            tracing::info!(
                "Assignment {} created in cohort {} by user {}",
                assignment.id,
                assignment.cohort_id,
                user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response(e, "Failed to create assignment")),
    }
}
