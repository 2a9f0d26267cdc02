//! Domain → wire conversions.

use uuid::Uuid;

use quill_core::domain::{CommentWithAuthor, Post, PostWithRelations, UserSummary};
use quill_shared::dto::{
    CommentDetails, CommentSummary, LikeDetails, PostCounts, PostDetailsResponse, PostResponse,
    UserResponse,
};

pub fn user(summary: &UserSummary) -> UserResponse {
    UserResponse {
        id: summary.id,
        email: summary.email.clone(),
    }
}

pub fn post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        author_id: post.author_id,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// Feed entry; `user_liked` is computed for `viewer`.
pub fn post_details(details: &PostWithRelations, viewer: Option<Uuid>) -> PostDetailsResponse {
    PostDetailsResponse {
        post: post(&details.post),
        author: user(&details.author),
        comments: details
            .comments
            .iter()
            .map(|c| CommentDetails {
                id: c.comment.id,
                content: c.comment.content.clone(),
                post_id: c.comment.post_id,
                user_id: c.comment.user_id,
                created_at: c.comment.created_at,
                user: user(&c.user),
            })
            .collect(),
        likes: details
            .likes
            .iter()
            .map(|l| LikeDetails {
                id: l.like.id,
                post_id: l.like.post_id,
                user_id: l.like.user_id,
                user: user(&l.user),
            })
            .collect(),
        count: PostCounts {
            likes: details.likes_count() as u64,
            comments: details.comments_count() as u64,
        },
        user_liked: details.liked_by(viewer),
    }
}

pub fn comment_summary(c: &CommentWithAuthor) -> CommentSummary {
    CommentSummary {
        id: c.comment.id,
        content: c.comment.content.clone(),
        author_email: c.user.email.clone(),
    }
}
