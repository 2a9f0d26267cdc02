//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use quill_core::domain::{
    CommentWithAuthor, Like, LikeWithUser, PostWithRelations, User, mask_email,
};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, LikeRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL like repository.
pub type PostgresLikeRepository = PostgresBaseRepository<LikeEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new_user: User) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(new_user)
            .insert(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }
}

impl PostgresPostRepository {
    /// Load comments and likes for `rows` in two queries and stitch them on.
    async fn attach_relations(
        &self,
        rows: Vec<(post::Model, Option<user::Model>)>,
    ) -> Result<Vec<PostWithRelations>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|(p, _)| p.id).collect();

        let comments = CommentEntity::find()
            .filter(comment::Column::PostId.is_in(ids.clone()))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let likes = LikeEntity::find()
            .filter(like::Column::PostId.is_in(ids))
            .find_also_related(UserEntity)
            .order_by_asc(like::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let mut comments_by_post: HashMap<Uuid, Vec<CommentWithAuthor>> = HashMap::new();
        for (c, u) in comments {
            if let Some(u) = u {
                comments_by_post
                    .entry(c.post_id)
                    .or_default()
                    .push(CommentWithAuthor {
                        comment: c.into(),
                        user: u.into(),
                    });
            }
        }

        let mut likes_by_post: HashMap<Uuid, Vec<LikeWithUser>> = HashMap::new();
        for (l, u) in likes {
            if let Some(u) = u {
                likes_by_post.entry(l.post_id).or_default().push(LikeWithUser {
                    like: l.into(),
                    user: u.into(),
                });
            }
        }

        let posts = rows
            .into_iter()
            .filter_map(|(p, author)| {
                let Some(author) = author else {
                    tracing::warn!(post_id = %p.id, "Post without author skipped");
                    return None;
                };
                Some(PostWithRelations {
                    comments: comments_by_post.remove(&p.id).unwrap_or_default(),
                    likes: likes_by_post.remove(&p.id).unwrap_or_default(),
                    author: author.into(),
                    post: p.into(),
                })
            })
            .collect();

        Ok(posts)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_with_relations(&self) -> Result<Vec<PostWithRelations>, RepoError> {
        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        self.attach_relations(rows).await
    }

    async fn find_with_relations(&self, id: Uuid) -> Result<Option<PostWithRelations>, RepoError> {
        let rows = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(self.attach_relations(rows).await?.into_iter().next())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(c, u)| {
                u.map(|u| CommentWithAuthor {
                    comment: c.into(),
                    user: u.into(),
                })
            })
            .collect())
    }

    async fn delete_owned(
        &self,
        id: Uuid,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        // Both statements are atomic on their own; the unique (post_id, user_id)
        // index turns a concurrent double insert into a no-op.
        let removed = LikeEntity::delete_many()
            .filter(like::Column::PostId.eq(post_id))
            .filter(like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if removed.rows_affected > 0 {
            tracing::debug!(%post_id, %user_id, "Like removed");
            return Ok(false);
        }

        let active_model: like::ActiveModel = Like::new(post_id, user_id).into();
        LikeEntity::insert(active_model)
            .on_conflict(
                OnConflict::columns([like::Column::PostId, like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        tracing::debug!(%post_id, %user_id, "Like added");
        Ok(true)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        LikeEntity::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}
