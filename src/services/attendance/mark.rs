use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::AttendanceUpsert, requests::MarkAttendanceRequest,
        responses::MarkAttendanceResponse,
    },
    cohorts::entities::CohortRole,
    gamification::entities::PointSource,
};
use crate::services::{
    access::CohortAccess, forbidden_response, gamification::award_points,
    storage_error_response, unauthorized_response,
};
use crate::utils::validate::parse_session_date;

pub async fn mark_attendance(
    service: &AttendanceService,
    mark_data: MarkAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };
    let cohort_id = mark_data.cohort_id;

    match storage.get_cohort_by_id(cohort_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CohortNotFound,
                "Cohort not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to mark attendance")),
    }

    match CohortAccess::resolve(storage.as_ref(), &user, cohort_id).await {
        Ok(access) if access.can_manage() => {}
        Ok(_) => {
            return Ok(forbidden_response(
                "Only cohort facilitators can mark attendance",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to mark attendance")),
    }

    let session_date = match parse_session_date(&mark_data.session_date) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AttendanceInvalid, msg)));
        }
    };

    if mark_data.records.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceInvalid,
            "At least one attendance record is required",
        )));
    }

    // 只能为本班期学员记考勤
    let students: HashSet<i64> = match storage
        .list_cohort_members(cohort_id, Some(CohortRole::Student))
        .await
    {
        Ok(members) => members.iter().map(|m| m.membership.user_id).collect(),
        Err(e) => return Ok(storage_error_response(e, "Failed to mark attendance")),
    };
    if let Some(entry) = mark_data
        .records
        .iter()
        .find(|entry| !students.contains(&entry.user_id))
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceInvalid,
            format!("User {} is not a student of this cohort", entry.user_id),
        )));
    }

    let mut records = Vec::with_capacity(mark_data.records.len());
    let mut points_awarded = 0;
    for entry in mark_data.records {
        let upsert = AttendanceUpsert {
            cohort_id,
            user_id: entry.user_id,
            session_date: session_date.clone(),
            status: entry.status,
            note: entry.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            marked_by: user.id,
        };
        let record = match storage.upsert_attendance(upsert).await {
            Ok(record) => record,
            Err(e) => return Ok(storage_error_response(e, "Failed to mark attendance")),
        };

        // 以考勤记录 ID 为关联，同一节课只计一次
        if record.status.is_attended() {
            points_awarded += award_points(
                storage.as_ref(),
                record.user_id,
                Some(cohort_id),
                PointSource::Attendance,
                record.id,
            )
            .await;
        }
        records.push(record);
    }

    tracing::info!(
        "Attendance for cohort {} on {} marked by user {} ({} records)",
        cohort_id,
        session_date,
        user.id,
        records.len()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAttendanceResponse {
            records,
            points_awarded,
        },
        "Attendance marked successfully",
    )))
}
