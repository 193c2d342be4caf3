use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{requests::AttendanceListParams, responses::AttendanceListResponse},
};
use crate::services::{
    access::CohortAccess, forbidden_response, storage_error_response, unauthorized_response,
};
use crate::utils::validate::parse_session_date;

pub async fn list_attendance(
    service: &AttendanceService,
    query: AttendanceListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let access = match CohortAccess::resolve(storage.as_ref(), &user, query.cohort_id).await {
        Ok(access) if access.can_view() => access,
        Ok(_) => return Ok(forbidden_response("No permission for this cohort")),
        Err(e) => return Ok(storage_error_response(e, "Failed to list attendance")),
    };

    let session_date = match query.session_date.as_deref() {
        Some(value) => match parse_session_date(value) {
            Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::AttendanceInvalid, msg)));
            }
        },
        None => None,
    };

    // 学员只能看到自己的记录
    let user_id = if access.can_manage() {
        query.user_id
    } else {
        Some(user.id)
    };

    match storage
        .list_attendance(query.cohort_id, session_date.as_deref(), user_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceListResponse { items },
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to list attendance")),
    }
}
