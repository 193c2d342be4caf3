//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::attendance::{
    ActiveModel as AttendanceActiveModel, Entity as Attendance, Model as AttendanceModel,
};
pub use super::badges::{ActiveModel as BadgeActiveModel, Entity as Badges, Model as BadgeModel};
pub use super::cohort_users::{
    ActiveModel as CohortUserActiveModel, Entity as CohortUsers, Model as CohortUserModel,
};
pub use super::cohorts::{ActiveModel as CohortActiveModel, Entity as Cohorts, Model as CohortModel};
pub use super::forum_answers::{
    ActiveModel as ForumAnswerActiveModel, Entity as ForumAnswers, Model as ForumAnswerModel,
};
pub use super::forum_posts::{
    ActiveModel as ForumPostActiveModel, Entity as ForumPosts, Model as ForumPostModel,
};
pub use super::point_events::{
    ActiveModel as PointEventActiveModel, Entity as PointEvents, Model as PointEventModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::user_badges::{
    ActiveModel as UserBadgeActiveModel, Entity as UserBadges, Model as UserBadgeModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
