//! SeaORM entities.

pub mod comment;
pub mod like;
pub mod post;
pub mod user;
