use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CohortService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

// 成员、作业、提交、考勤和论坛内容由外键级联删除
pub async fn delete_cohort(
    service: &CohortService,
    cohort_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_cohort(cohort_id).await {
        Ok(true) => {
            tracing::info!("Cohort {} deleted", cohort_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Cohort deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CohortNotFound,
            "Cohort not found",
        ))),
        Err(e) => Ok(storage_error_response(e, "Cohort deletion failed")),
    }
}
