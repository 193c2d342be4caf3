use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_with_access};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden_response, storage_error_response, unauthorized_response};

pub async fn delete_assignment(
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
        "Failed to delete assignment",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    if !access.can_manage() {
        return Ok(forbidden_response(
            "Only cohort facilitators can delete assignments",
        ));
    }

    match storage.delete_assignment(assignment_id).await {
        Ok(true) => {
            tracing::info!("Assignment {} deleted by user {}", assignment_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Assignment deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to delete assignment")),
    }
}
