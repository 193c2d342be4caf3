use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::{ForumService, load_post_with_access, validate_body};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    forum::{
        entities::sort_answers,
        requests::{CreatePostRequest, ForumPostListParams, ForumPostListQuery},
        responses::{ForumAnswerItem, ForumPostDetailResponse},
    },
    gamification::entities::PointSource,
    users::entities::UserSummary,
};
use crate::services::{
    access::CohortAccess, forbidden_response, gamification::award_points,
    storage_error_response, unauthorized_response,
};
use crate::utils::validate::validate_title;

pub async fn list_posts(
    service: &ForumService,
    query: ForumPostListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    match CohortAccess::resolve(storage.as_ref(), &user, query.cohort_id).await {
        Ok(access) if access.can_view() => {}
        Ok(_) => return Ok(forbidden_response("No permission for this cohort")),
        Err(e) => return Ok(storage_error_response(e, "Failed to list posts")),
    }

    let (page, size) = query.pagination.normalized();
    let list_query = ForumPostListQuery {
        page,
        size,
        cohort_id: query.cohort_id,
        solved: query.solved,
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    match storage.list_forum_posts_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Post list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to list posts")),
    }
}

pub async fn create_post(
    service: &ForumService,
    mut post_data: CreatePostRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    match CohortAccess::resolve(storage.as_ref(), &user, post_data.cohort_id).await {
        Ok(access) if access.can_view() => {}
        Ok(_) => return Ok(forbidden_response("No permission for this cohort")),
        Err(e) => return Ok(storage_error_response(e, "Failed to create post")),
    }

    post_data.title = match validate_title(&post_data.title, 200) {
        Ok(title) => title,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ForumContentEmpty, msg)));
        }
    };
    post_data.body = match validate_body(&post_data.body) {
        Ok(body) => body,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ForumContentEmpty, msg)));
        }
    };

    let post = match storage.create_forum_post(user.id, post_data).await {
        Ok(post) => post,
        Err(e) => return Ok(storage_error_response(e, "Failed to create post")),
    };

    award_points(
        storage.as_ref(),
        user.id,
        Some(post.cohort_id),
        PointSource::ForumPost,
        post.id,
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(post, "Post created successfully")))
}

pub async fn get_post(
    service: &ForumService,
    post_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (post, access) =
        match load_post_with_access(storage.as_ref(), &user, post_id, "Failed to get post").await
        {
            Ok(found) => found,
            Err(response) => return Ok(response),
        };
    if !access.can_view() {
        return Ok(forbidden_response("No permission for this cohort"));
    }

    let mut answers = match storage.list_forum_answers(post_id).await {
        Ok(answers) => answers,
        Err(e) => return Ok(storage_error_response(e, "Failed to get post")),
    };
    sort_answers(&mut answers);

    let mut author_ids: Vec<i64> = answers.iter().map(|a| a.author_id).collect();
    author_ids.push(post.author_id);
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i64, UserSummary> = match storage.get_users_by_ids(&author_ids).await {
        Ok(users) => users.iter().map(|u| (u.id, UserSummary::from(u))).collect(),
        Err(e) => return Ok(storage_error_response(e, "Failed to get post")),
    };

    let answers = answers
        .into_iter()
        .map(|answer| ForumAnswerItem {
            author: authors.get(&answer.author_id).cloned(),
            answer,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ForumPostDetailResponse {
            author: authors.get(&post.author_id).cloned(),
            post,
            answers,
        },
        "Post retrieved successfully",
    )))
}

pub async fn delete_post(
    service: &ForumService,
    post_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (post, access) =
        match load_post_with_access(storage.as_ref(), &user, post_id, "Failed to delete post")
            .await
        {
            Ok(found) => found,
            Err(response) => return Ok(response),
        };

    // 作者本人或班期管理者
    if post.author_id != user.id && !access.can_manage() {
        return Ok(forbidden_response("No permission to delete this post"));
    }

    match storage.delete_forum_post(post_id).await {
        Ok(true) => {
            tracing::info!("Post {} deleted by user {}", post_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Post deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ForumPostNotFound,
            "Post not found",
        ))),
        Err(e) => Ok(storage_error_response(e, "Failed to delete post")),
    }
}
