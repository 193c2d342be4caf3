use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    attendance::{
        entities::{AttendanceCounts, AttendanceRecord},
        requests::AttendanceSummaryParams,
        responses::{AttendanceSummaryItem, AttendanceSummaryResponse},
    },
    cohorts::entities::{CohortMember, CohortRole},
};
use crate::services::{
    access::CohortAccess, forbidden_response, storage_error_response, unauthorized_response,
};

/// 按学员汇总考勤，没有记录的学员计数为 0
pub(crate) fn summarize(
    cohort_id: i64,
    students: Vec<CohortMember>,
    records: &[AttendanceRecord],
) -> AttendanceSummaryResponse {
    let mut per_user: HashMap<i64, AttendanceCounts> = HashMap::new();
    let mut overall = AttendanceCounts::default();
    for record in records {
        per_user.entry(record.user_id).or_default().add(record.status);
        overall.add(record.status);
    }

    let items = students
        .into_iter()
        .map(|member| {
            let counts = per_user
                .get(&member.membership.user_id)
                .copied()
                .unwrap_or_default();
            AttendanceSummaryItem {
                user: member.user,
                counts,
                attendance_rate: counts.rate(),
            }
        })
        .collect();

    AttendanceSummaryResponse {
        cohort_id,
        items,
        overall,
        overall_rate: overall.rate(),
    }
}

pub async fn attendance_summary(
    service: &AttendanceService,
    query: AttendanceSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };
    let cohort_id = query.cohort_id;

    let access = match CohortAccess::resolve(storage.as_ref(), &user, cohort_id).await {
        Ok(access) if access.can_view() => access,
        Ok(_) => return Ok(forbidden_response("No permission for this cohort")),
        Err(e) => return Ok(storage_error_response(e, "Failed to summarize attendance")),
    };

    let (mut students, records) = match tokio::try_join!(
        storage.list_cohort_members(cohort_id, Some(CohortRole::Student)),
        storage.list_attendance(cohort_id, None, None),
    ) {
        Ok(result) => result,
        Err(e) => return Ok(storage_error_response(e, "Failed to summarize attendance")),
    };

    // 学员只看自己的汇总
    let records = if access.can_manage() {
        records
    } else {
        students.retain(|m| m.membership.user_id == user.id);
        records.into_iter().filter(|r| r.user_id == user.id).collect()
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summarize(cohort_id, students, &records),
        "Attendance summary retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        attendance::entities::AttendanceStatus,
        cohorts::entities::CohortMembership,
        users::entities::UserSummary,
    };

    fn member(user_id: i64) -> CohortMember {
        CohortMember {
            membership: CohortMembership {
                id: user_id,
                cohort_id: 1,
                user_id,
                role: CohortRole::Student,
                joined_at: chrono::Utc::now(),
            },
            user: UserSummary {
                id: user_id,
                username: format!("student{user_id}"),
                display_name: None,
                avatar_url: None,
            },
        }
    }

    fn record(user_id: i64, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            cohort_id: 1,
            user_id,
            session_date: "2025-09-01".to_string(),
            status,
            note: None,
            marked_by: 99,
            marked_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_summarize_counts_per_student() {
        let records = vec![
            record(1, AttendanceStatus::Present),
            record(1, AttendanceStatus::Absent),
            record(2, AttendanceStatus::Late),
        ];
        let summary = summarize(1, vec![member(1), member(2), member(3)], &records);

        assert_eq!(summary.items.len(), 3);
        assert_eq!(summary.items[0].counts.present, 1);
        assert_eq!(summary.items[0].attendance_rate, Some(50.0));
        assert_eq!(summary.items[1].attendance_rate, Some(100.0));
        assert_eq!(summary.items[2].counts.total, 0);
        assert_eq!(summary.items[2].attendance_rate, None);
        assert_eq!(summary.overall.total, 3);
        assert_eq!(summary.overall_rate, Some(66.67));
    }
}
