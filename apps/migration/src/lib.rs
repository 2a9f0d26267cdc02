//! Schema migrations for the Quill blog database.

pub use sea_orm_migration::prelude::*;

mod m20241015_000001_create_users;
mod m20241015_000002_create_posts;
mod m20241015_000003_create_comments_and_likes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241015_000001_create_users::Migration),
            Box::new(m20241015_000002_create_posts::Migration),
            Box::new(m20241015_000003_create_comments_and_likes::Migration),
        ]
    }
}
