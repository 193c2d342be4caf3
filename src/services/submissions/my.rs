use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, submissions::responses::MySubmissionListResponse};
use crate::services::{storage_error_response, unauthorized_response};

pub async fn list_my_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    match storage.list_submissions_by_student(user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MySubmissionListResponse { items },
            "Submission list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to list submissions")),
    }
}
