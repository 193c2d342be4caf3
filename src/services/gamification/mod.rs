pub mod award;
pub mod badges;
pub mod engine;
pub mod leaderboard;
pub mod profile;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::gamification::requests::{CreateBadgeRequest, LeaderboardParams};
use crate::storage::Storage;

pub use award::{award_points, evaluate_badges};

pub struct GamificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl GamificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 当前用户的积分概况
    pub async fn my_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::my_profile(self, request).await
    }

    // 指定用户的积分概况（管理员/讲师）
    pub async fn user_profile(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::user_profile(self, user_id, request).await
    }

    pub async fn leaderboard(
        &self,
        query: LeaderboardParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        leaderboard::leaderboard(self, query, request).await
    }

    pub async fn list_badges(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        badges::list_badges(self, request).await
    }

    pub async fn create_badge(
        &self,
        badge_data: CreateBadgeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        badges::create_badge(self, badge_data, request).await
    }
}
