use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceEntry {
    pub user_id: i64,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub cohort_id: i64,
    pub session_date: String,
    pub records: Vec<AttendanceEntry>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListParams {
    pub cohort_id: i64,
    pub session_date: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummaryParams {
    pub cohort_id: i64,
}
