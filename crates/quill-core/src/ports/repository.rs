use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, CommentWithAuthor, Post, PostWithRelations, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` if nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Accounts are only ever inserted, never updated or deleted.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user. `RepoError::Constraint` if the email is taken.
    async fn insert(&self, user: User) -> Result<User, RepoError>;
}

/// Post repository. Deleting a post removes its comments and likes.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest first, with author, comments and likes attached.
    async fn list_with_relations(&self) -> Result<Vec<PostWithRelations>, RepoError>;

    async fn find_with_relations(&self, id: Uuid) -> Result<Option<PostWithRelations>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post in creation order, with their authors.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError>;

    /// Delete `id` only if it sits on `post_id` and was written by `user_id`.
    /// Returns `RepoError::NotFound` otherwise.
    async fn delete_owned(&self, id: Uuid, post_id: Uuid, user_id: Uuid)
    -> Result<(), RepoError>;
}

/// Like repository. Likes are unique per `(post_id, user_id)`.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flip the user's like on a post. Returns `true` when the post is now liked.
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}
