//! 积分流水与徽章存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation, map_unique};
use crate::entity::attendance::{Column as AttendanceColumn, Entity as Attendance};
use crate::entity::badges::{ActiveModel as BadgeActiveModel, Column as BadgeColumn, Entity as Badges};
use crate::entity::point_events::{ActiveModel, Column, Entity as PointEvents};
use crate::entity::ts_to_datetime;
use crate::entity::user_badges::{
    ActiveModel as UserBadgeActiveModel, Column as UserBadgeColumn, Entity as UserBadges,
};
use crate::errors::{Result, SkillLinkError};
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::gamification::entities::{
    Badge, EarnedBadge, NewBadge, PointAward, PointEvent, UserStats,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 记录积分，(用户, 来源, 关联ID) 唯一，重复记录返回 None
    pub async fn record_point_event_impl(&self, award: PointAward) -> Result<Option<PointEvent>> {
        let model = ActiveModel {
            user_id: Set(award.user_id),
            cohort_id: Set(award.cohort_id),
            source: Set(award.source.as_str().to_string()),
            reference_id: Set(award.reference_id),
            points: Set(award.points),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(row) => Ok(row.into_point_event()),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(SkillLinkError::database_operation(format!(
                "记录积分失败: {e}"
            ))),
        }
    }

    pub async fn list_point_events_impl(&self, user_id: i64) -> Result<Vec<PointEvent>> {
        let rows = PointEvents::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询积分流水失败: {e}")))?;

        Ok(rows.into_iter().filter_map(|m| m.into_point_event()).collect())
    }

    /// 按用户汇总积分
    ///
    /// 结果按总分降序，同分按用户 ID 升序。
    pub async fn sum_points_by_user_impl(
        &self,
        user_ids: Option<&[i64]>,
    ) -> Result<Vec<(i64, i64)>> {
        let mut select = PointEvents::find()
            .select_only()
            .column(Column::UserId)
            .column(Column::Points);
        if let Some(ids) = user_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::UserId.is_in(ids.iter().copied()));
        }

        let rows: Vec<(i64, i32)> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("汇总积分失败: {e}")))?;

        let mut totals: HashMap<i64, i64> = HashMap::new();
        for (user_id, points) in rows {
            *totals.entry(user_id).or_default() += points as i64;
        }

        let mut ranked: Vec<(i64, i64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(ranked)
    }

    /// 徽章判定所需统计（不含连续天数）
    pub async fn get_user_stats_impl(&self, user_id: i64) -> Result<UserStats> {
        let total_points = self
            .sum_points_by_user_impl(Some(std::slice::from_ref(&user_id)))
            .await?
            .first()
            .map(|(_, total)| *total)
            .unwrap_or(0);

        let attendance_present = Attendance::find()
            .filter(AttendanceColumn::UserId.eq(user_id))
            .filter(AttendanceColumn::Status.eq(AttendanceStatus::Present.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计考勤失败: {e}")))?;

        Ok(UserStats {
            total_points,
            current_streak: 0,
            submissions: self.count_submissions_by_student(user_id).await?,
            accepted_answers: self.count_accepted_answers_by_author(user_id).await?,
            attendance_present: attendance_present as i64,
        })
    }

    pub async fn list_badges_impl(&self) -> Result<Vec<Badge>> {
        let rows = Badges::find()
            .order_by_asc(BadgeColumn::Criterion)
            .order_by_asc(BadgeColumn::Threshold)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询徽章失败: {e}")))?;

        Ok(rows.into_iter().filter_map(|m| m.into_badge()).collect())
    }

    pub async fn get_badge_by_code_impl(&self, code: &str) -> Result<Option<Badge>> {
        let row = Badges::find()
            .filter(BadgeColumn::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询徽章失败: {e}")))?;

        Ok(row.and_then(|m| m.into_badge()))
    }

    pub async fn create_badge_impl(&self, badge: NewBadge) -> Result<Badge> {
        let model = BadgeActiveModel {
            code: Set(badge.code),
            name: Set(badge.name),
            description: Set(badge.description),
            icon: Set(badge.icon),
            criterion: Set(badge.criterion.as_str().to_string()),
            threshold: Set(badge.threshold),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let row = model
            .insert(&self.db)
            .await
            .map_err(|e| map_unique(e, "徽章代码已存在", "创建徽章失败"))?;

        row.into_badge()
            .ok_or_else(|| SkillLinkError::validation("Invalid badge criterion"))
    }

    /// 用户已获得的徽章，按获得时间排序
    pub async fn list_user_badges_impl(&self, user_id: i64) -> Result<Vec<EarnedBadge>> {
        let rows = UserBadges::find()
            .filter(UserBadgeColumn::UserId.eq(user_id))
            .find_also_related(Badges)
            .order_by_asc(UserBadgeColumn::AwardedAt)
            .order_by_asc(UserBadgeColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户徽章失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(user_badge, badge)| {
                badge.and_then(|b| b.into_badge()).map(|badge| EarnedBadge {
                    badge,
                    awarded_at: ts_to_datetime(user_badge.awarded_at),
                })
            })
            .collect())
    }

    /// 授予徽章，已拥有时返回 false
    pub async fn award_badge_impl(&self, user_id: i64, badge_id: i64) -> Result<bool> {
        let model = UserBadgeActiveModel {
            user_id: Set(user_id),
            badge_id: Set(badge_id),
            awarded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(SkillLinkError::database_operation(format!(
                "授予徽章失败: {e}"
            ))),
        }
    }
}
