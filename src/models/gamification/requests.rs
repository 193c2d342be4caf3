use serde::Deserialize;
use ts_rs::TS;

use super::entities::BadgeCriterion;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct LeaderboardParams {
    pub cohort_id: Option<i64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct CreateBadgeRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub criterion: BadgeCriterion,
    pub threshold: i64,
}
