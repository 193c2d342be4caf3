pub mod analytics;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod cohorts;
pub mod dashboard;
pub mod forum;
pub mod frontend;
pub mod gamification;
pub mod submissions;
pub mod users;

pub use analytics::configure_analytics_routes;
pub use assignments::configure_assignment_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use cohorts::configure_cohort_routes;
pub use dashboard::configure_dashboard_routes;
pub use forum::configure_forum_routes;
pub use frontend::configure_frontend_routes;
pub use gamification::configure_gamification_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;
