//! 考勤存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance, Model};
use crate::errors::{Result, SkillLinkError};
use crate::models::attendance::entities::{AttendanceRecord, AttendanceUpsert};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    async fn find_attendance_row(&self, record: &AttendanceUpsert) -> Result<Option<Model>> {
        Attendance::find()
            .filter(Column::CohortId.eq(record.cohort_id))
            .filter(Column::UserId.eq(record.user_id))
            .filter(Column::SessionDate.eq(record.session_date.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询考勤记录失败: {e}")))
    }

    async fn update_attendance_row(
        &self,
        row: Model,
        record: AttendanceUpsert,
    ) -> Result<AttendanceRecord> {
        let mut model: ActiveModel = row.into();
        model.status = Set(record.status.as_str().to_string());
        model.note = Set(record.note);
        model.marked_by = Set(record.marked_by);
        model.marked_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("更新考勤记录失败: {e}")))?;

        Ok(result.into_record())
    }

    /// 标记考勤，同一 (班期, 用户, 日期) 只保留一行
    pub async fn upsert_attendance_impl(
        &self,
        record: AttendanceUpsert,
    ) -> Result<AttendanceRecord> {
        if let Some(row) = self.find_attendance_row(&record).await? {
            return self.update_attendance_row(row, record).await;
        }

        let model = ActiveModel {
            cohort_id: Set(record.cohort_id),
            user_id: Set(record.user_id),
            session_date: Set(record.session_date.clone()),
            status: Set(record.status.as_str().to_string()),
            note: Set(record.note.clone()),
            marked_by: Set(record.marked_by),
            marked_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(row) => Ok(row.into_record()),
            // 并发标记时另一请求已插入，改为更新
            Err(e) if is_unique_violation(&e) => match self.find_attendance_row(&record).await? {
                Some(row) => self.update_attendance_row(row, record).await,
                None => Err(SkillLinkError::database_operation(format!(
                    "标记考勤失败: {e}"
                ))),
            },
            Err(e) => Err(SkillLinkError::database_operation(format!(
                "标记考勤失败: {e}"
            ))),
        }
    }

    /// 查询班期考勤，可按日期与用户过滤
    pub async fn list_attendance_impl(
        &self,
        cohort_id: i64,
        session_date: Option<&str>,
        user_id: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut select = Attendance::find().filter(Column::CohortId.eq(cohort_id));
        if let Some(date) = session_date {
            select = select.filter(Column::SessionDate.eq(date));
        }
        if let Some(user_id) = user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        let rows = select
            .order_by_desc(Column::SessionDate)
            .order_by_asc(Column::UserId)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_record()).collect())
    }

    /// 用户在所有班期的考勤
    pub async fn list_user_attendance_impl(&self, user_id: i64) -> Result<Vec<AttendanceRecord>> {
        let rows = Attendance::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::SessionDate)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_record()).collect())
    }
}
