use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CommentWithAuthor, LikeWithUser, UserSummary};

/// Post entity - a blog post owned by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace title and content, bumping `updated_at`.
    pub fn edit(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
        self.updated_at = Utc::now();
    }
}

/// A post joined with its author, comments and likes.
#[derive(Debug, Clone)]
pub struct PostWithRelations {
    pub post: Post,
    pub author: UserSummary,
    pub comments: Vec<CommentWithAuthor>,
    pub likes: Vec<LikeWithUser>,
}

impl PostWithRelations {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn comments_count(&self) -> usize {
        self.comments.len()
    }

    /// Whether `viewer` has a like on this post. Anonymous viewers never do.
    pub fn liked_by(&self, viewer: Option<Uuid>) -> bool {
        match viewer {
            Some(user_id) => self.likes.iter().any(|l| l.like.user_id == user_id),
            None => false,
        }
    }
}
