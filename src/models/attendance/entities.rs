use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Excused => "excused",
        }
    }

    /// 出席或迟到都算到场
    pub fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "absent" => Ok(AttendanceStatus::Absent),
            "excused" => Ok(AttendanceStatus::Excused),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub cohort_id: i64,
    pub user_id: i64,
    /// YYYY-MM-DD
    pub session_date: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub marked_by: i64,
    pub marked_at: chrono::DateTime<chrono::Utc>,
}

/// 按状态统计的考勤次数
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceCounts {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    pub total: i64,
}

impl AttendanceCounts {
    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
        self.total += 1;
    }

    pub fn from_statuses<I: IntoIterator<Item = AttendanceStatus>>(statuses: I) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.add(status);
        }
        counts
    }

    /// (出席 + 迟到) / 全部记录 × 100，无记录时为 None
    pub fn rate(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let rate = (self.present + self.late) as f64 / self.total as f64 * 100.0;
        Some((rate * 100.0).round() / 100.0)
    }
}

/// 存储层 upsert 入参
#[derive(Debug, Clone)]
pub struct AttendanceUpsert {
    pub cohort_id: i64,
    pub user_id: i64,
    pub session_date: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub marked_by: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_rate() {
        let counts = AttendanceCounts::from_statuses([
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
        ]);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.rate(), Some(66.67));
        assert_eq!(AttendanceCounts::default().rate(), None);
    }
}
