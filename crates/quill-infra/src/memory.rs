//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the relational schema: unique emails, foreign keys, cascading post
//! deletes and unique `(post_id, user_id)` likes. Data is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{
    Comment, CommentWithAuthor, Like, LikeWithUser, Post, PostWithRelations, User, UserSummary,
    mask_email,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Insertion order.
    posts: Vec<Post>,
    /// Insertion order.
    comments: Vec<Comment>,
    likes: Vec<Like>,
}

impl Tables {
    fn summary(&self, user_id: Uuid) -> Option<UserSummary> {
        self.users.get(&user_id).map(User::summary)
    }

    fn post_exists(&self, post_id: Uuid) -> bool {
        self.posts.iter().any(|p| p.id == post_id)
    }

    fn comments_of(&self, post_id: Uuid) -> Vec<CommentWithAuthor> {
        self.comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                self.summary(c.user_id).map(|user| CommentWithAuthor {
                    comment: c.clone(),
                    user,
                })
            })
            .collect()
    }

    fn with_relations(&self, post: &Post) -> Option<PostWithRelations> {
        let author = self.summary(post.author_id)?;
        let likes = self
            .likes
            .iter()
            .filter(|l| l.post_id == post.id)
            .filter_map(|l| {
                self.summary(l.user_id).map(|user| LikeWithUser {
                    like: l.clone(),
                    user,
                })
            })
            .collect();

        Some(PostWithRelations {
            post: post.clone(),
            author,
            comments: self.comments_of(post.id),
            likes,
        })
    }
}

/// Shared in-memory tables behind one async `RwLock`.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email (in-memory)");

        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users.email must be unique".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint("posts.author_id references users".to_string()));
        }
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|c| c.post_id != id);
        tables.likes.retain(|l| l.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list_with_relations(&self) -> Result<Vec<PostWithRelations>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .rev()
            .filter_map(|p| tables.with_relations(p))
            .collect())
    }

    async fn find_with_relations(&self, id: Uuid) -> Result<Option<PostWithRelations>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| tables.with_relations(p)))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.post_exists(comment.post_id) || !tables.users.contains_key(&comment.user_id) {
            return Err(RepoError::Constraint(
                "comments must reference an existing post and user".to_string(),
            ));
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError> {
        Ok(self.tables.read().await.comments_of(post_id))
    }

    async fn delete_owned(
        &self,
        id: Uuid,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables
            .comments
            .retain(|c| !(c.id == id && c.post_id == post_id && c.user_id == user_id));
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        // Check and write happen under one write guard.
        let mut tables = self.tables.write().await;
        if let Some(pos) = tables
            .likes
            .iter()
            .position(|l| l.post_id == post_id && l.user_id == user_id)
        {
            tables.likes.remove(pos);
            return Ok(false);
        }
        if !tables.post_exists(post_id) || !tables.users.contains_key(&user_id) {
            return Err(RepoError::Constraint(
                "likes must reference an existing post and user".to_string(),
            ));
        }
        tables.likes.push(Like::new(post_id, user_id));
        Ok(true)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.likes.iter().filter(|l| l.post_id == post_id).count() as u64)
    }
}
