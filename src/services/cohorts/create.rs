use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CohortService, validate_date_range};
use crate::errors::SkillLinkError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, cohorts::requests::CreateCohortRequest};
use crate::services::{storage_error_response, unauthorized_response};
use crate::utils::validate::validate_title;

pub async fn create_cohort(
    service: &CohortService,
    mut cohort_data: CreateCohortRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(creator_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    cohort_data.name = match validate_title(&cohort_data.name, 100) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::CohortNameInvalid, msg)));
        }
    };

    if let Err(msg) = validate_date_range(cohort_data.start_date, cohort_data.end_date) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CohortDateInvalid, msg)));
    }

    match storage.get_cohort_by_name(&cohort_data.name).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CohortAlreadyExists,
                "Cohort name already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error_response(e, "Cohort creation failed")),
    }

    match storage.create_cohort(creator_id, cohort_data).await {
        Ok(cohort) => {
            tracing::info!("Cohort {} created by user {}", cohort.id, creator_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(cohort, "Cohort created successfully")))
        }
        Err(SkillLinkError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::CohortAlreadyExists, "Cohort name already exists"),
        )),
        Err(e) => Ok(storage_error_response(e, "Cohort creation failed")),
    }
}
