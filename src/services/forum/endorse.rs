use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ForumService, load_post_with_access};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, gamification::entities::PointSource};
use crate::services::{
    forbidden_response, gamification::award_points, storage_error_response,
    unauthorized_response,
};

pub async fn toggle_endorsement(
    service: &ForumService,
    answer_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let answer = match storage.get_forum_answer(answer_id).await {
        Ok(Some(answer)) => answer,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ForumAnswerNotFound,
                "Answer not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to endorse answer")),
    };

    let (post, access) = match load_post_with_access(
        storage.as_ref(),
        &user,
        answer.post_id,
        "Failed to endorse answer",
    )
    .await
    {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };

    if !access.can_manage() {
        return Ok(forbidden_response(
            "Only cohort facilitators can endorse answers",
        ));
    }

    let endorsed_by = (!answer.is_endorsed).then_some(user.id);
    let answer = match storage.set_answer_endorsement(answer_id, endorsed_by).await {
        Ok(Some(answer)) => answer,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ForumAnswerNotFound,
                "Answer not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to endorse answer")),
    };

    // 以回答 ID 为关联，反复切换也只在第一次认可时加分
    if answer.is_endorsed {
        award_points(
            storage.as_ref(),
            answer.author_id,
            Some(post.cohort_id),
            PointSource::AnswerEndorsed,
            answer.id,
        )
        .await;
    }

    let message = if answer.is_endorsed {
        "Answer endorsed successfully"
    } else {
        "Answer endorsement removed"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(answer, message)))
}
