use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 积分来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub enum PointSource {
    Submission,
    OnTimeBonus,
    ForumPost,
    ForumAnswer,
    AnswerAccepted,
    AnswerEndorsed,
    Attendance,
}

impl PointSource {
    pub fn all() -> &'static [PointSource] {
        &[
            PointSource::Submission,
            PointSource::OnTimeBonus,
            PointSource::ForumPost,
            PointSource::ForumAnswer,
            PointSource::AnswerAccepted,
            PointSource::AnswerEndorsed,
            PointSource::Attendance,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointSource::Submission => "submission",
            PointSource::OnTimeBonus => "on_time_bonus",
            PointSource::ForumPost => "forum_post",
            PointSource::ForumAnswer => "forum_answer",
            PointSource::AnswerAccepted => "answer_accepted",
            PointSource::AnswerEndorsed => "answer_endorsed",
            PointSource::Attendance => "attendance",
        }
    }
}

impl std::fmt::Display for PointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PointSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PointSource::all()
            .iter()
            .copied()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| format!("Invalid point source: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct PointEvent {
    pub id: i64,
    pub user_id: i64,
    pub cohort_id: Option<i64>,
    pub source: PointSource,
    pub reference_id: i64,
    pub points: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 一次积分奖励
#[derive(Debug, Clone, Copy)]
pub struct PointAward {
    pub user_id: i64,
    pub cohort_id: Option<i64>,
    pub source: PointSource,
    pub reference_id: i64,
    pub points: i32,
}

/// 徽章判定条件
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub enum BadgeCriterion {
    TotalPoints,
    StreakDays,
    Submissions,
    AcceptedAnswers,
    AttendancePresent,
}

impl BadgeCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeCriterion::TotalPoints => "total_points",
            BadgeCriterion::StreakDays => "streak_days",
            BadgeCriterion::Submissions => "submissions",
            BadgeCriterion::AcceptedAnswers => "accepted_answers",
            BadgeCriterion::AttendancePresent => "attendance_present",
        }
    }
}

impl std::str::FromStr for BadgeCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total_points" => Ok(BadgeCriterion::TotalPoints),
            "streak_days" => Ok(BadgeCriterion::StreakDays),
            "submissions" => Ok(BadgeCriterion::Submissions),
            "accepted_answers" => Ok(BadgeCriterion::AcceptedAnswers),
            "attendance_present" => Ok(BadgeCriterion::AttendancePresent),
            _ => Err(format!("Invalid badge criterion: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct Badge {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub criterion: BadgeCriterion,
    pub threshold: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 新徽章（存储层入参）
#[derive(Debug, Clone)]
pub struct NewBadge {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub criterion: BadgeCriterion,
    pub threshold: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct EarnedBadge {
    pub badge: Badge,
    pub awarded_at: chrono::DateTime<chrono::Utc>,
}

/// 徽章判定所需的用户统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct UserStats {
    pub total_points: i64,
    pub current_streak: i64,
    pub submissions: i64,
    pub accepted_answers: i64,
    pub attendance_present: i64,
}

impl UserStats {
    pub fn value_for(&self, criterion: BadgeCriterion) -> i64 {
        match criterion {
            BadgeCriterion::TotalPoints => self.total_points,
            BadgeCriterion::StreakDays => self.current_streak,
            BadgeCriterion::Submissions => self.submissions,
            BadgeCriterion::AcceptedAnswers => self.accepted_answers,
            BadgeCriterion::AttendancePresent => self.attendance_present,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_source_round_trip_names() {
        for source in PointSource::all() {
            assert_eq!(source.as_str().parse::<PointSource>().unwrap(), *source);
        }
        assert!("bonus".parse::<PointSource>().is_err());
    }
}
