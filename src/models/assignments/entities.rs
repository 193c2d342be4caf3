use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub cohort_id: i64,
    pub created_by: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 截止时间已过
    pub fn is_past_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_date.is_some_and(|due| now > due)
    }
}
