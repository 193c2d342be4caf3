pub mod answers;
pub mod endorse;
pub mod posts;
pub mod solve;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    forum::{
        entities::ForumPost,
        requests::{CreateAnswerRequest, CreatePostRequest, ForumPostListParams, SolvePostRequest},
    },
    users::entities::User,
};
use crate::services::{access::CohortAccess, storage_error_response};
use crate::storage::Storage;

pub struct ForumService {
    storage: Option<Arc<dyn Storage>>,
}

impl ForumService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_posts(
        &self,
        query: ForumPostListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        posts::list_posts(self, query, request).await
    }

    pub async fn create_post(
        &self,
        post_data: CreatePostRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        posts::create_post(self, post_data, request).await
    }

    pub async fn get_post(&self, post_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        posts::get_post(self, post_id, request).await
    }

    pub async fn delete_post(
        &self,
        post_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        posts::delete_post(self, post_id, request).await
    }

    pub async fn create_answer(
        &self,
        post_id: i64,
        answer_data: CreateAnswerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        answers::create_answer(self, post_id, answer_data, request).await
    }

    // 采纳回答
    pub async fn solve_post(
        &self,
        post_id: i64,
        solve_data: SolvePostRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        solve::solve_post(self, post_id, solve_data, request).await
    }

    // 切换讲师认可
    pub async fn toggle_endorsement(
        &self,
        answer_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        endorse::toggle_endorsement(self, answer_id, request).await
    }
}

/// 取出帖子和当前用户在其班期中的身份
pub(crate) async fn load_post_with_access(
    storage: &dyn Storage,
    user: &User,
    post_id: i64,
    context: &str,
) -> Result<(ForumPost, CohortAccess), HttpResponse> {
    let post = match storage.get_forum_post(post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ForumPostNotFound,
                "Post not found",
            )));
        }
        Err(e) => return Err(storage_error_response(e, context)),
    };

    match CohortAccess::resolve(storage, user, post.cohort_id).await {
        Ok(access) => Ok((post, access)),
        Err(e) => Err(storage_error_response(e, context)),
    }
}

/// 正文类文本：去除首尾空白后非空
pub(crate) fn validate_body(body: &str) -> Result<String, &'static str> {
    let body = body.trim();
    if body.is_empty() {
        return Err("Content must not be empty");
    }
    if body.chars().count() > 20_000 {
        return Err("Content must be at most 20000 characters");
    }
    Ok(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_body() {
        assert_eq!(validate_body("  How do lifetimes work?  ").unwrap(), "How do lifetimes work?");
        assert!(validate_body(" \n\t ").is_err());
        assert!(validate_body(&"x".repeat(20_001)).is_err());
    }
}
