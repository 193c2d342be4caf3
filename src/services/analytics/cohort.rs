use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{HashMap, HashSet};

use super::{AnalyticsService, compute};
use crate::config::{AnalyticsConfig, AppConfig};
use crate::models::{
    ApiResponse, ErrorCode,
    analytics::responses::{AssignmentStats, AtRiskStudent, CohortAnalyticsResponse},
    assignments::entities::Assignment,
    attendance::entities::{AttendanceCounts, AttendanceRecord},
    cohorts::entities::{CohortMember, CohortRole},
    submissions::entities::Submission,
};
use crate::services::storage_error_response;

/// 班期分析的原始数据
pub(crate) struct CohortData {
    pub students: Vec<CohortMember>,
    pub assignments: Vec<Assignment>,
    pub submissions: Vec<Submission>,
    pub attendance: Vec<AttendanceRecord>,
}

pub(crate) fn analyze(
    cohort_id: i64,
    data: CohortData,
    now: chrono::DateTime<chrono::Utc>,
    config: &AnalyticsConfig,
) -> CohortAnalyticsResponse {
    let student_ids: HashSet<i64> = data
        .students
        .iter()
        .map(|m| m.membership.user_id)
        .collect();
    let max_scores: HashMap<i64, f64> = data
        .assignments
        .iter()
        .map(|a| (a.id, a.max_score))
        .collect();

    // 只统计当前学员的提交
    let submissions: Vec<&Submission> = data
        .submissions
        .iter()
        .filter(|s| student_ids.contains(&s.student_id))
        .collect();

    let graded_percentage = |s: &Submission| {
        s.score
            .zip(max_scores.get(&s.assignment_id).copied())
            .and_then(|(score, max)| compute::percentage(score, max))
    };

    let percentages: Vec<f64> = submissions.iter().filter_map(|s| graded_percentage(s)).collect();

    let per_assignment = data
        .assignments
        .iter()
        .map(|assignment| {
            let subs: Vec<&&Submission> = submissions
                .iter()
                .filter(|s| s.assignment_id == assignment.id)
                .collect();
            let scores: Vec<f64> = subs.iter().filter_map(|s| s.score).collect();
            AssignmentStats {
                assignment_id: assignment.id,
                title: assignment.title.clone(),
                max_score: assignment.max_score,
                submitted_count: subs.len() as i64,
                graded_count: scores.len() as i64,
                average_score: compute::average(&scores),
            }
        })
        .collect();

    let attendance = AttendanceCounts::from_statuses(
        data.attendance
            .iter()
            .filter(|r| student_ids.contains(&r.user_id))
            .map(|r| r.status),
    );

    let past_due: Vec<i64> = data
        .assignments
        .iter()
        .filter(|a| a.is_past_due(now))
        .map(|a| a.id)
        .collect();

    let at_risk_students = data
        .students
        .iter()
        .filter_map(|member| {
            let user_id = member.membership.user_id;
            let mine: Vec<&&Submission> = submissions
                .iter()
                .filter(|s| s.student_id == user_id)
                .collect();

            let grades: Vec<f64> = mine.iter().filter_map(|s| graded_percentage(s)).collect();
            let average_grade = compute::average(&grades);

            let attendance_rate = AttendanceCounts::from_statuses(
                data.attendance
                    .iter()
                    .filter(|r| r.user_id == user_id)
                    .map(|r| r.status),
            )
            .rate();

            let submitted: HashSet<i64> = mine.iter().map(|s| s.assignment_id).collect();
            let missing = past_due.iter().filter(|id| !submitted.contains(id)).count() as i64;

            let reasons = compute::at_risk_reasons(average_grade, attendance_rate, missing, config);
            (!reasons.is_empty()).then(|| AtRiskStudent {
                user: member.user.clone(),
                average_grade_percentage: average_grade,
                attendance_rate,
                missing_assignments: missing,
                reasons,
            })
        })
        .collect();

    let expected = (data.students.len() * data.assignments.len()) as u64;

    CohortAnalyticsResponse {
        cohort_id,
        student_count: data.students.len() as i64,
        assignment_count: data.assignments.len() as i64,
        grade_distribution: compute::grade_distribution(&percentages),
        average_grade_percentage: compute::average(&percentages),
        completion_rate: compute::completion_rate(submissions.len() as u64, expected),
        attendance_rate: attendance.rate(),
        per_assignment,
        at_risk_students,
    }
}

pub async fn cohort_analytics(
    service: &AnalyticsService,
    cohort_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_cohort_by_id(cohort_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CohortNotFound,
                "Cohort not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to compute analytics")),
    }

    let cohort_ids = [cohort_id];
    let (students, assignments, attendance) = match tokio::try_join!(
        storage.list_cohort_members(cohort_id, Some(CohortRole::Student)),
        storage.list_assignments_by_cohorts(&cohort_ids),
        storage.list_attendance(cohort_id, None, None),
    ) {
        Ok(result) => result,
        Err(e) => return Ok(storage_error_response(e, "Failed to compute analytics")),
    };

    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let submissions = match storage.list_submissions_by_assignments(&assignment_ids).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(storage_error_response(e, "Failed to compute analytics")),
    };

    let data = CohortData {
        students,
        assignments,
        submissions,
        attendance,
    };
    let response = analyze(
        cohort_id,
        data,
        chrono::Utc::now(),
        &AppConfig::get().analytics,
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Cohort analytics retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        attendance::entities::AttendanceStatus, cohorts::entities::CohortMembership,
        submissions::entities::SubmissionStatus, users::entities::UserSummary,
    };
    use chrono::{Duration, Utc};

    fn student(user_id: i64) -> CohortMember {
        CohortMember {
            membership: CohortMembership {
                id: user_id,
                cohort_id: 1,
                user_id,
                role: CohortRole::Student,
                joined_at: Utc::now(),
            },
            user: UserSummary {
                id: user_id,
                username: format!("student{user_id}"),
                display_name: None,
                avatar_url: None,
            },
        }
    }

    fn assignment(id: i64, due_in_days: i64) -> Assignment {
        Assignment {
            id,
            cohort_id: 1,
            created_by: Some(9),
            title: format!("Assignment {id}"),
            description: None,
            max_score: 50.0,
            due_date: Some(Utc::now() + Duration::days(due_in_days)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(id: i64, assignment_id: i64, student_id: i64, score: Option<f64>) -> Submission {
        Submission {
            id,
            assignment_id,
            student_id,
            content: "done".to_string(),
            attachment_url: None,
            status: if score.is_some() {
                SubmissionStatus::Graded
            } else {
                SubmissionStatus::Submitted
            },
            is_late: false,
            score,
            feedback: None,
            graded_by: None,
            graded_at: None,
            submitted_at: Utc::now(),
        }
    }

    fn attendance(user_id: i64, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            cohort_id: 1,
            user_id,
            session_date: "2025-09-01".to_string(),
            status,
            note: None,
            marked_by: 9,
            marked_at: Utc::now(),
        }
    }

    #[test]
    fn test_analyze_cohort() {
        let data = CohortData {
            students: vec![student(1), student(2)],
            assignments: vec![assignment(10, -3), assignment(11, -1), assignment(12, 7)],
            submissions: vec![
                submission(100, 10, 1, Some(47.0)),
                submission(101, 11, 1, Some(41.0)),
                submission(102, 12, 1, None),
                submission(103, 10, 2, Some(10.0)),
                // 非学员的提交不计入
                submission(104, 10, 3, Some(50.0)),
            ],
            attendance: vec![
                attendance(1, AttendanceStatus::Present),
                attendance(2, AttendanceStatus::Absent),
                attendance(2, AttendanceStatus::Late),
            ],
        };

        let result = analyze(1, data, Utc::now(), &AnalyticsConfig::default());

        assert_eq!(result.student_count, 2);
        assert_eq!(result.assignment_count, 3);
        assert_eq!(result.completion_rate, 66.67);
        let counts: Vec<i64> = result.grade_distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 1]);
        assert_eq!(result.attendance_rate, Some(66.67));
        assert_eq!(result.per_assignment[0].submitted_count, 2);
        assert_eq!(result.per_assignment[0].average_score, Some(28.5));
        assert_eq!(result.per_assignment[2].graded_count, 0);

        assert_eq!(result.at_risk_students.len(), 1);
        let risky = &result.at_risk_students[0];
        assert_eq!(risky.user.id, 2);
        assert_eq!(risky.missing_assignments, 1);
        assert_eq!(risky.average_grade_percentage, Some(20.0));
        assert_eq!(risky.reasons.len(), 2);
    }

    #[test]
    fn test_analyze_empty_cohort() {
        let data = CohortData {
            students: Vec::new(),
            assignments: Vec::new(),
            submissions: Vec::new(),
            attendance: Vec::new(),
        };
        let result = analyze(1, data, Utc::now(), &AnalyticsConfig::default());
        assert_eq!(result.completion_rate, 0.0);
        assert_eq!(result.average_grade_percentage, None);
        assert_eq!(result.attendance_rate, None);
        assert!(result.at_risk_students.is_empty());
    }
}
