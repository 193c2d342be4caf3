use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CohortService, validate_date_range};
use crate::errors::SkillLinkError;
use crate::models::{ApiResponse, ErrorCode, cohorts::requests::UpdateCohortRequest};
use crate::services::storage_error_response;
use crate::utils::validate::validate_title;

pub async fn update_cohort(
    service: &CohortService,
    cohort_id: i64,
    mut update_data: UpdateCohortRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let existing = match storage.get_cohort_by_id(cohort_id).await {
        Ok(Some(cohort)) => cohort,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CohortNotFound,
                "Cohort not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to update cohort")),
    };

    if let Some(name) = update_data.name.take() {
        let name = match validate_title(&name, 100) {
            Ok(name) => name,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::CohortNameInvalid, msg)));
            }
        };
        match storage.get_cohort_by_name(&name).await {
            Ok(Some(other)) if other.id != cohort_id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::CohortAlreadyExists,
                    "Cohort name already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_error_response(e, "Failed to update cohort")),
        }
        update_data.name = Some(name);
    }

    // 与未修改的一侧合并后再比较
    let start = update_data.start_date.or(existing.start_date);
    let end = update_data.end_date.or(existing.end_date);
    if let Err(msg) = validate_date_range(start, end) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CohortDateInvalid, msg)));
    }

    match storage.update_cohort(cohort_id, update_data).await {
        Ok(Some(cohort)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            cohort,
            "Cohort updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CohortNotFound,
            "Cohort not found",
        ))),
        Err(SkillLinkError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::CohortAlreadyExists, "Cohort name already exists"),
        )),
        Err(e) => Ok(storage_error_response(e, "Failed to update cohort")),
    }
}
