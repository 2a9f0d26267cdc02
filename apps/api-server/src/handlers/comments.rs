//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Comment, validation};
use quill_core::error::RepoError;
use quill_shared::MessageResponse;
use quill_shared::dto::{CommentRequest, CommentResponse, CommentSummary, UserResponse};

use super::posts::post_not_found;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(post_not_found(post_id));
    }
    validation::validate_comment(&req.content)?;

    let comment = state
        .comments
        .create(Comment::new(post_id, identity.user_id, req.content))
        .await?;
    tracing::info!(comment_id = %comment.id, %post_id, "Comment added");

    Ok(HttpResponse::Created().json(CommentResponse {
        id: comment.id,
        content: comment.content,
        user: UserResponse {
            id: identity.user_id,
            email: identity.email,
        },
    }))
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.find_by_post(path.into_inner()).await?;

    let body: Vec<CommentSummary> = comments.iter().map(views::comment_summary).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/posts/{id}/comments/{comment_id}
///
/// Only the comment's author can delete it.
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    state
        .comments
        .delete_owned(comment_id, post_id, identity.user_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => {
                AppError::NotFound("Comment not found or unauthorized".to_string())
            }
            other => other.into(),
        })?;
    tracing::info!(%comment_id, %post_id, "Comment deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted")))
}
