use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::{UserRole, UserSummary};

// 班期状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub enum CohortStatus {
    Active,
    Archived,
}

impl CohortStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CohortStatus::Active => "active",
            CohortStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for CohortStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CohortStatus::Active),
            "archived" => Ok(CohortStatus::Archived),
            _ => Err(format!("Invalid cohort status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct Cohort {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub status: CohortStatus,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班期内角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub enum CohortRole {
    Student,
    Facilitator,
}

impl CohortRole {
    pub const STUDENT: &'static str = "student";
    pub const FACILITATOR: &'static str = "facilitator";

    pub fn facilitator_roles() -> &'static [&'static CohortRole] {
        &[&Self::Facilitator]
    }
    pub fn all_roles() -> &'static [&'static CohortRole] {
        &[&Self::Student, &Self::Facilitator]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CohortRole::Student => Self::STUDENT,
            CohortRole::Facilitator => Self::FACILITATOR,
        }
    }

    /// 班期角色必须与账号角色一致，管理员不作为成员加入
    pub fn is_compatible_with(&self, account_role: UserRole) -> bool {
        matches!(
            (self, account_role),
            (CohortRole::Student, UserRole::Student)
                | (CohortRole::Facilitator, UserRole::Facilitator)
        )
    }
}

impl<'de> Deserialize<'de> for CohortRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid cohort role: '{s}'. Supported roles: student, facilitator"
            ))
        })
    }
}

impl std::fmt::Display for CohortRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CohortRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CohortRole::STUDENT => Ok(CohortRole::Student),
            CohortRole::FACILITATOR => Ok(CohortRole::Facilitator),
            _ => Err(format!("Invalid cohort role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct CohortMembership {
    pub id: i64,
    pub cohort_id: i64,
    pub user_id: i64,
    pub role: CohortRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// 带用户信息的成员
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct CohortMember {
    #[serde(flatten)]
    #[ts(flatten)]
    pub membership: CohortMembership,
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_compatibility() {
        assert!(CohortRole::Student.is_compatible_with(UserRole::Student));
        assert!(CohortRole::Facilitator.is_compatible_with(UserRole::Facilitator));
        assert!(!CohortRole::Facilitator.is_compatible_with(UserRole::Student));
        assert!(!CohortRole::Student.is_compatible_with(UserRole::Facilitator));
        assert!(!CohortRole::Student.is_compatible_with(UserRole::Admin));
    }
}
