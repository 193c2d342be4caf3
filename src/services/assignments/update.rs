use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_with_access, validate_max_score};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, assignments::requests::UpdateAssignmentRequest};
use crate::services::{forbidden_response, storage_error_response, unauthorized_response};
use crate::utils::validate::validate_title;

pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    mut update_data: UpdateAssignmentRequest,
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
        "Failed to update assignment",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    if !access.can_manage() {
        return Ok(forbidden_response(
            "Only cohort facilitators can update assignments",
        ));
    }

    if let Some(title) = update_data.title.take() {
        update_data.title = match validate_title(&title, 200) {
            Ok(title) => Some(title),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
            }
        };
    }

    if let Some(max_score) = update_data.max_score {
        if let Err(msg) = validate_max_score(max_score) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
        }
        // 不能低于已有的最高分
        match storage.get_highest_score(assignment_id).await {
            Ok(Some(highest)) if max_score < highest => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentInvalid,
                    format!("Max score cannot be lower than an existing grade ({highest})"),
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_error_response(e, "Failed to update assignment")),
        }
    }

    match storage.update_assignment(assignment_id, update_data).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to update assignment")),
    }
}
