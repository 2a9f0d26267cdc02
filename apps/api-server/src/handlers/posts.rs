//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Post, validation};
use quill_core::error::{DomainError, RepoError};
use quill_shared::MessageResponse;
use quill_shared::dto::{PostDetailsResponse, PostRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn post_not_found(id: Uuid) -> AppError {
    DomainError::not_found("Post", id).into()
}

/// Map a repository miss on `id` to "Post not found".
fn or_post_not_found(id: Uuid) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound => post_not_found(id),
        other => other.into(),
    }
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_with_relations().await?;
    let viewer = viewer.user_id();

    let body: Vec<PostDetailsResponse> = posts
        .iter()
        .map(|p| views::post_details(p, viewer))
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_with_relations(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    Ok(HttpResponse::Ok().json(views::post_details(&post, viewer.user_id())))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validation::validate_post(&req.title, &req.content)?;

    let post = state
        .posts
        .create(Post::new(identity.user_id, req.title, req.content))
        .await?;
    tracing::info!(post_id = %post.id, author_id = %identity.user_id, "Post created");

    Ok(HttpResponse::Created().json(views::post(&post)))
}

/// PUT /api/posts/{id}
///
/// Any authenticated user may edit any post.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    validation::validate_post(&req.title, &req.content)?;

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    if post.author_id != identity.user_id {
        tracing::warn!(post_id = %id, editor_id = %identity.user_id, "Post edited by non-author");
    }

    post.edit(req.title, req.content);
    let post = state
        .posts
        .update(post)
        .await
        .map_err(or_post_not_found(id))?;

    Ok(HttpResponse::Ok().json(views::post(&post)))
}

/// DELETE /api/posts/{id}
///
/// Any authenticated user may delete any post. Comments and likes go with it.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .posts
        .delete(id)
        .await
        .map_err(or_post_not_found(id))?;
    tracing::info!(post_id = %id, deleted_by = %identity.user_id, "Post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}
