//! 积分、连续天数与徽章判定
//!
//! 这里只有纯计算，读写数据库在 `award` 和各接口模块中完成。

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use crate::config::PointsConfig;
use crate::models::gamification::{
    entities::{Badge, BadgeCriterion, NewBadge, PointEvent, PointSource, UserStats},
    responses::PointBreakdown,
};

/// 配置中该来源对应的积分
pub fn points_for(config: &PointsConfig, source: PointSource) -> i32 {
    match source {
        PointSource::Submission => config.submission,
        PointSource::OnTimeBonus => config.on_time_bonus,
        PointSource::ForumPost => config.forum_post,
        PointSource::ForumAnswer => config.forum_answer,
        PointSource::AnswerAccepted => config.answer_accepted,
        PointSource::AnswerEndorsed => config.answer_endorsed,
        PointSource::Attendance => config.attendance,
    }
}

/// 积分流水对应的活跃日期（UTC），升序去重
pub fn activity_days(events: &[PointEvent]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = events.iter().map(|e| e.created_at.date_naive()).collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// 返回 (当前连续天数, 历史最长连续天数)
///
/// 当前连续天数以今天结尾；今天还没有活动时以昨天结尾。
/// `days` 须为升序且无重复。
pub fn compute_streaks(days: &[NaiveDate], today: NaiveDate) -> (i64, i64) {
    let mut longest = 0i64;
    let mut run = 0i64;
    let mut prev: Option<NaiveDate> = None;

    for day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(*day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*day);
    }

    // 最后一段连续区间是否延续到今天或昨天
    let current = match prev {
        Some(last) if last == today || last.succ_opt() == Some(today) => run,
        _ => 0,
    };

    (current, longest)
}

/// 按来源汇总积分，顺序与 `PointSource::all()` 一致，不含没有流水的来源
pub fn breakdown(events: &[PointEvent]) -> Vec<PointBreakdown> {
    let mut totals: BTreeMap<usize, (i64, i64)> = BTreeMap::new();
    for event in events {
        let order = PointSource::all()
            .iter()
            .position(|s| *s == event.source)
            .unwrap_or(usize::MAX);
        let entry = totals.entry(order).or_insert((0, 0));
        entry.0 += i64::from(event.points);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .filter_map(|(order, (points, events))| {
            PointSource::all()
                .get(order)
                .map(|source| PointBreakdown {
                    source: *source,
                    points,
                    events,
                })
        })
        .collect()
}

/// 满足条件但尚未获得的徽章
pub fn eligible_badges<'a>(
    badges: &'a [Badge],
    earned: &HashSet<i64>,
    stats: &UserStats,
) -> Vec<&'a Badge> {
    badges
        .iter()
        .filter(|badge| !earned.contains(&badge.id))
        .filter(|badge| stats.value_for(badge.criterion) >= badge.threshold)
        .collect()
}

/// 排名：积分降序，同分按用户 ID 升序
///
/// 返回 (名次, 用户ID, 积分)
pub fn rank_entries(mut totals: Vec<(i64, i64)>, limit: usize) -> Vec<(i64, i64, i64)> {
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    totals
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (user_id, points))| (idx as i64 + 1, user_id, points))
        .collect()
}

/// 启动时写入的默认徽章
pub fn default_badges() -> Vec<NewBadge> {
    let badge = |code: &str, name: &str, description: &str, icon: &str, criterion, threshold| {
        NewBadge {
            code: code.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            icon: Some(icon.to_string()),
            criterion,
            threshold,
        }
    };

    vec![
        badge(
            "first_submission",
            "First Steps",
            "Submit your first assignment",
            "rocket",
            BadgeCriterion::Submissions,
            1,
        ),
        badge(
            "ten_submissions",
            "Diligent Learner",
            "Submit 10 assignments",
            "book",
            BadgeCriterion::Submissions,
            10,
        ),
        badge(
            "points_100",
            "Century",
            "Earn 100 points",
            "star",
            BadgeCriterion::TotalPoints,
            100,
        ),
        badge(
            "points_500",
            "High Achiever",
            "Earn 500 points",
            "trophy",
            BadgeCriterion::TotalPoints,
            500,
        ),
        badge(
            "streak_3",
            "Warming Up",
            "Stay active 3 days in a row",
            "flame",
            BadgeCriterion::StreakDays,
            3,
        ),
        badge(
            "streak_7",
            "On Fire",
            "Stay active 7 days in a row",
            "fire",
            BadgeCriterion::StreakDays,
            7,
        ),
        badge(
            "helpful_hand",
            "Helpful Hand",
            "Have an answer accepted in the forum",
            "handshake",
            BadgeCriterion::AcceptedAnswers,
            1,
        ),
        badge(
            "mentor",
            "Mentor",
            "Have 10 answers accepted in the forum",
            "graduation-cap",
            BadgeCriterion::AcceptedAnswers,
            10,
        ),
        badge(
            "regular",
            "Regular",
            "Be marked present at 10 sessions",
            "calendar-check",
            BadgeCriterion::AttendancePresent,
            10,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(id: i64, source: PointSource, points: i32, ts: i64) -> PointEvent {
        PointEvent {
            id,
            user_id: 1,
            cohort_id: None,
            source,
            reference_id: id,
            points,
            created_at: chrono::DateTime::from_timestamp(ts, 0).unwrap(),
        }
    }

    fn badge(id: i64, criterion: BadgeCriterion, threshold: i64) -> Badge {
        Badge {
            id,
            code: format!("b{id}"),
            name: format!("Badge {id}"),
            description: None,
            icon: None,
            criterion,
            threshold,
            created_at: chrono::DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    #[test]
    fn test_streak_ending_today() {
        let days = [d(2025, 3, 1), d(2025, 3, 2), d(2025, 3, 3)];
        assert_eq!(compute_streaks(&days, d(2025, 3, 3)), (3, 3));
    }

    #[test]
    fn test_streak_ending_yesterday_still_counts() {
        let days = [d(2025, 3, 1), d(2025, 3, 2)];
        assert_eq!(compute_streaks(&days, d(2025, 3, 3)), (2, 2));
    }

    #[test]
    fn test_streak_broken() {
        let days = [
            d(2025, 2, 1),
            d(2025, 2, 2),
            d(2025, 2, 3),
            d(2025, 2, 4),
            d(2025, 2, 10),
        ];
        assert_eq!(compute_streaks(&days, d(2025, 2, 20)), (0, 4));
        assert_eq!(compute_streaks(&days, d(2025, 2, 11)), (1, 4));
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let days = [d(2025, 1, 30), d(2025, 1, 31), d(2025, 2, 1)];
        assert_eq!(compute_streaks(&days, d(2025, 2, 1)), (3, 3));
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(compute_streaks(&[], d(2025, 1, 1)), (0, 0));
    }

    #[test]
    fn test_activity_days_dedup_by_utc_date() {
        // 同一天的两条流水只算一天
        let events = vec![
            event(1, PointSource::Submission, 10, 1_700_000_000),
            event(2, PointSource::OnTimeBonus, 5, 1_700_000_100),
            event(3, PointSource::ForumPost, 2, 1_700_000_000 + 86_400),
        ];
        let days = activity_days(&events);
        assert_eq!(days.len(), 2);
        assert!(days[0] < days[1]);
    }

    #[test]
    fn test_breakdown_by_source() {
        let events = vec![
            event(1, PointSource::ForumPost, 2, 0),
            event(2, PointSource::Submission, 10, 0),
            event(3, PointSource::Submission, 10, 0),
        ];
        let result = breakdown(&events);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].source, PointSource::Submission);
        assert_eq!(result[0].points, 20);
        assert_eq!(result[0].events, 2);
        assert_eq!(result[1].source, PointSource::ForumPost);
    }

    #[test]
    fn test_badge_eligibility() {
        let badges = vec![
            badge(1, BadgeCriterion::Submissions, 1),
            badge(2, BadgeCriterion::TotalPoints, 100),
            badge(3, BadgeCriterion::StreakDays, 3),
        ];
        let stats = UserStats {
            total_points: 120,
            current_streak: 2,
            submissions: 1,
            accepted_answers: 0,
            attendance_present: 0,
        };
        let earned: HashSet<i64> = [1].into_iter().collect();
        let ids: Vec<i64> = eligible_badges(&badges, &earned, &stats)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_rank_entries_ties_by_user_id() {
        let ranked = rank_entries(vec![(5, 30), (2, 50), (3, 30), (9, 0)], 3);
        assert_eq!(ranked, vec![(1, 2, 50), (2, 3, 30), (3, 5, 30)]);
    }

    #[test]
    fn test_points_for_uses_config() {
        let config = PointsConfig::default();
        assert_eq!(points_for(&config, PointSource::Submission), 10);
        assert_eq!(points_for(&config, PointSource::AnswerAccepted), 15);
        assert_eq!(points_for(&config, PointSource::Attendance), 2);
    }

    #[test]
    fn test_default_badge_codes_unique() {
        let badges = default_badges();
        let codes: HashSet<&str> = badges.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes.len(), badges.len());
    }
}
