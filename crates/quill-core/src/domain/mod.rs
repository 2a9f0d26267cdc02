//! Domain entities - the core business objects.

mod comment;
mod like;
mod post;
mod user;
pub mod validation;

pub use comment::{Comment, CommentWithAuthor};
pub use like::{Like, LikeWithUser};
pub use post::{Post, PostWithRelations};
pub use user::{User, UserSummary, mask_email};
