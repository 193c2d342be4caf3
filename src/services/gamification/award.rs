//! 积分发放与徽章判定
//!
//! 发放失败只记录日志，不影响触发它的业务请求。

use std::collections::HashSet;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::gamification::entities::{Badge, PointAward, PointSource};
use crate::storage::Storage;

use super::engine;

/// 按配置积分发放一次奖励，返回实际发放的积分（重复事件为 0）
pub async fn award_points(
    storage: &dyn Storage,
    user_id: i64,
    cohort_id: Option<i64>,
    source: PointSource,
    reference_id: i64,
) -> i32 {
    let points = engine::points_for(&AppConfig::get().gamification.points, source);
    if points <= 0 {
        return 0;
    }

    let award = PointAward {
        user_id,
        cohort_id,
        source,
        reference_id,
        points,
    };

    match storage.record_point_event(award).await {
        Ok(Some(event)) => {
            tracing::debug!(
                "Awarded {} points to user {} for {} #{}",
                event.points,
                user_id,
                source,
                reference_id
            );
            if let Err(e) = evaluate_badges(storage, user_id).await {
                tracing::warn!("Failed to evaluate badges for user {}: {}", user_id, e);
            }
            event.points
        }
        Ok(None) => {
            tracing::debug!(
                "Points for {} #{} already awarded to user {}",
                source,
                reference_id,
                user_id
            );
            0
        }
        Err(e) => {
            tracing::warn!(
                "Failed to award {} points to user {}: {}",
                source,
                user_id,
                e
            );
            0
        }
    }
}

/// 根据最新统计补发徽章，返回新获得的徽章
pub async fn evaluate_badges(storage: &dyn Storage, user_id: i64) -> Result<Vec<Badge>> {
    let (mut stats, events, badges, earned) = tokio::try_join!(
        storage.get_user_stats(user_id),
        storage.list_point_events(user_id),
        storage.list_badges(),
        storage.list_user_badges(user_id),
    )?;

    let today = chrono::Utc::now().date_naive();
    let (current_streak, _) = engine::compute_streaks(&engine::activity_days(&events), today);
    stats.current_streak = current_streak;

    let earned_ids: HashSet<i64> = earned.iter().map(|e| e.badge.id).collect();
    let mut granted = Vec::new();
    for badge in engine::eligible_badges(&badges, &earned_ids, &stats) {
        if storage.award_badge(user_id, badge.id).await? {
            tracing::info!("User {} earned badge {}", user_id, badge.code);
            granted.push(badge.clone());
        }
    }

    Ok(granted)
}
