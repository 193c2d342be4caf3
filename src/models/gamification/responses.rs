use serde::Serialize;
use ts_rs::TS;

use super::entities::{Badge, EarnedBadge, PointSource};
use crate::models::users::entities::UserSummary;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct PointBreakdown {
    pub source: PointSource,
    pub points: i64,
    pub events: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct GamificationProfile {
    pub user_id: i64,
    pub total_points: i64,
    pub breakdown: Vec<PointBreakdown>,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub badges: Vec<EarnedBadge>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user: UserSummary,
    pub total_points: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct LeaderboardResponse {
    pub cohort_id: Option<i64>,
    pub items: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct BadgeListResponse {
    pub items: Vec<Badge>,
}
