use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::{DASHBOARD_LIST_LIMIT, DashboardService};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    assignments::entities::Assignment,
    attendance::entities::AttendanceCounts,
    cohorts::entities::CohortRole,
    dashboard::responses::StudentDashboardResponse,
    submissions::responses::MySubmissionItem,
};
use crate::services::{
    gamification::profile::build_profile, storage_error_response, unauthorized_response,
};

/// 未提交且未过期的作业，有截止时间的按时间先后排在前面
pub(crate) fn upcoming_assignments(
    assignments: Vec<Assignment>,
    submitted: &HashSet<i64>,
    now: chrono::DateTime<chrono::Utc>,
    limit: usize,
) -> Vec<Assignment> {
    let mut upcoming: Vec<Assignment> = assignments
        .into_iter()
        .filter(|a| !submitted.contains(&a.id) && !a.is_past_due(now))
        .collect();
    upcoming.sort_by_key(|a| (a.due_date.is_none(), a.due_date, a.id));
    upcoming.truncate(limit);
    upcoming
}

/// 最近评分的提交
pub(crate) fn recent_grades(
    mut submissions: Vec<MySubmissionItem>,
    limit: usize,
) -> Vec<MySubmissionItem> {
    submissions.retain(|item| item.submission.score.is_some());
    submissions.sort_by(|a, b| b.submission.graded_at.cmp(&a.submission.graded_at));
    submissions.truncate(limit);
    submissions
}

pub async fn student_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized_response());
    };

    let (cohorts, submissions, attendance, profile) = match tokio::try_join!(
        storage.list_user_cohorts(user_id, Some(CohortRole::Student)),
        storage.list_submissions_by_student(user_id),
        storage.list_user_attendance(user_id),
        build_profile(storage.as_ref(), user_id),
    ) {
        Ok(result) => result,
        Err(e) => return Ok(storage_error_response(e, "Failed to load dashboard")),
    };

    let cohort_ids: Vec<i64> = cohorts.iter().map(|c| c.id).collect();
    let assignments = match storage.list_assignments_by_cohorts(&cohort_ids).await {
        Ok(assignments) => assignments,
        Err(e) => return Ok(storage_error_response(e, "Failed to load dashboard")),
    };

    let submitted: HashSet<i64> = submissions
        .iter()
        .map(|item| item.submission.assignment_id)
        .collect();
    let attendance_counts = AttendanceCounts::from_statuses(attendance.iter().map(|r| r.status));

    let response = StudentDashboardResponse {
        cohorts,
        upcoming_assignments: upcoming_assignments(
            assignments,
            &submitted,
            chrono::Utc::now(),
            DASHBOARD_LIST_LIMIT,
        ),
        recent_grades: recent_grades(submissions, DASHBOARD_LIST_LIMIT),
        attendance_rate: attendance_counts.rate(),
        attendance: attendance_counts,
        total_points: profile.total_points,
        current_streak: profile.current_streak,
        longest_streak: profile.longest_streak,
        badges: profile.badges,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Dashboard retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assignment(id: i64, due: Option<i64>) -> Assignment {
        Assignment {
            id,
            cohort_id: 1,
            created_by: Some(1),
            title: format!("A{id}"),
            description: None,
            max_score: 100.0,
            due_date: due.map(|days| Utc::now() + Duration::days(days)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_upcoming_assignments() {
        let assignments = vec![
            assignment(1, Some(5)),
            assignment(2, None),
            assignment(3, Some(-1)),
            assignment(4, Some(2)),
            assignment(5, Some(1)),
        ];
        let submitted: HashSet<i64> = [5].into_iter().collect();

        let upcoming = upcoming_assignments(assignments, &submitted, Utc::now(), 10);
        let ids: Vec<i64> = upcoming.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![4, 1, 2]);
    }
}
