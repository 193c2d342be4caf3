//! 班期内的访问判定
//!
//! 路径中不带 `{cohort_id}` 的接口（作业、提交、论坛等）无法使用
//! `RequireCohortRole` 中间件，由服务层先找到资源所属班期再判定。

use crate::errors::Result;
use crate::models::cohorts::entities::CohortRole;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 当前用户在某个班期中的身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortAccess {
    Admin,
    Facilitator,
    Student,
    Outsider,
}

impl CohortAccess {
    pub async fn resolve(storage: &dyn Storage, user: &User, cohort_id: i64) -> Result<Self> {
        if user.is_admin() {
            return Ok(CohortAccess::Admin);
        }

        let access = match storage.get_cohort_member(cohort_id, user.id).await? {
            Some(member) => match member.role {
                CohortRole::Facilitator => CohortAccess::Facilitator,
                CohortRole::Student => CohortAccess::Student,
            },
            None => CohortAccess::Outsider,
        };
        Ok(access)
    }

    /// 可查看班期内容
    pub fn can_view(&self) -> bool {
        !matches!(self, CohortAccess::Outsider)
    }

    /// 可管理班期内容（评分、考勤、认可回答等）
    pub fn can_manage(&self) -> bool {
        matches!(self, CohortAccess::Admin | CohortAccess::Facilitator)
    }

    pub fn is_student(&self) -> bool {
        matches!(self, CohortAccess::Student)
    }
}

/// 当前用户可见的班期，管理员为 None（不限制）
pub async fn visible_cohort_ids(storage: &dyn Storage, user: &User) -> Result<Option<Vec<i64>>> {
    if user.is_admin() {
        return Ok(None);
    }
    let memberships = storage.list_user_memberships(user.id).await?;
    Ok(Some(memberships.into_iter().map(|m| m.cohort_id).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_levels() {
        assert!(CohortAccess::Admin.can_manage());
        assert!(CohortAccess::Facilitator.can_manage());
        assert!(!CohortAccess::Student.can_manage());
        assert!(CohortAccess::Student.can_view());
        assert!(!CohortAccess::Outsider.can_view());
        assert!(CohortAccess::Student.is_student());
        assert!(!CohortAccess::Admin.is_student());
    }
}
