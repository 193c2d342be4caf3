use serde::Serialize;
use ts_rs::TS;

use crate::models::assignments::entities::Assignment;
use crate::models::attendance::entities::AttendanceCounts;
use crate::models::cohorts::entities::Cohort;
use crate::models::forum::entities::ForumPost;
use crate::models::gamification::entities::EarnedBadge;
use crate::models::submissions::responses::{MySubmissionItem, SubmissionWithStudent};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboardResponse {
    pub cohorts: Vec<Cohort>,
    pub upcoming_assignments: Vec<Assignment>,
    pub recent_grades: Vec<MySubmissionItem>,
    pub attendance: AttendanceCounts,
    pub attendance_rate: Option<f64>,
    pub total_points: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub badges: Vec<EarnedBadge>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct FacilitatorCohortSummary {
    pub cohort: Cohort,
    pub student_count: i64,
    pub assignment_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct FacilitatorDashboardResponse {
    pub cohorts: Vec<FacilitatorCohortSummary>,
    pub pending_submissions: Vec<SubmissionWithStudent>,
    pub unanswered_posts: Vec<ForumPost>,
}
