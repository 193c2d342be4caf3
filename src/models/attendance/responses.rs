use serde::Serialize;
use ts_rs::TS;

use super::entities::{AttendanceCounts, AttendanceRecord};
use crate::models::users::entities::UserSummary;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceResponse {
    pub records: Vec<AttendanceRecord>,
    pub points_awarded: i32,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceRecord>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummaryItem {
    pub user: UserSummary,
    pub counts: AttendanceCounts,
    pub attendance_rate: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummaryResponse {
    pub cohort_id: i64,
    pub items: Vec<AttendanceSummaryItem>,
    pub overall: AttendanceCounts,
    pub overall_rate: Option<f64>,
}
