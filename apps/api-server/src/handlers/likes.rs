//! Like toggle handler.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::LikeToggleResponse;

use super::posts::post_not_found;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(post_not_found(post_id));
    }

    let liked = state.likes.toggle(post_id, identity.user_id).await?;
    let likes_count = state.likes.count_by_post(post_id).await?;

    let message = if liked { "Post liked" } else { "Post unliked" };
    tracing::debug!(%post_id, user_id = %identity.user_id, liked, likes_count, "Like toggled");

    Ok(HttpResponse::Ok().json(LikeToggleResponse {
        message: message.to_string(),
        likes_count,
        user_liked: liked,
    }))
}
