use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::UserSummary;

/// 成绩分布区间
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct GradeBucket {
    pub range: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AssignmentStats {
    pub assignment_id: i64,
    pub title: String,
    pub max_score: f64,
    pub submitted_count: i64,
    pub graded_count: i64,
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AtRiskStudent {
    pub user: UserSummary,
    pub average_grade_percentage: Option<f64>,
    pub attendance_rate: Option<f64>,
    pub missing_assignments: i64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct CohortAnalyticsResponse {
    pub cohort_id: i64,
    pub student_count: i64,
    pub assignment_count: i64,
    pub grade_distribution: Vec<GradeBucket>,
    pub average_grade_percentage: Option<f64>,
    pub completion_rate: f64,
    pub attendance_rate: Option<f64>,
    pub per_assignment: Vec<AssignmentStats>,
    pub at_risk_students: Vec<AtRiskStudent>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct UserRoleCounts {
    pub admin: i64,
    pub facilitator: i64,
    pub student: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct PlatformOverviewResponse {
    pub users: UserRoleCounts,
    pub cohorts: i64,
    pub assignments: i64,
    pub submissions: i64,
    pub graded_submissions: i64,
    pub completion_rate: f64,
}
