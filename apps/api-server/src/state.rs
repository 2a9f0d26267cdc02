//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, LikeRepository, PostRepository, UserRepository};
use quill_infra::InMemoryStore;
use quill_infra::database::DatabaseConfig;

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresLikeRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    tracing::info!("Application state initialized (postgres)");
                    Self::postgres(connections)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            Self::in_memory()
        };

        state
    }

    /// State backed by a single shared in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        tracing::info!("Application state initialized (in-memory)");

        Self {
            users: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            likes: Arc::new(store),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: DatabaseConnections) -> Self {
        let conn = connections.main.clone();

        Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            likes: Arc::new(PostgresLikeRepository::new(conn)),
            db: Some(Arc::new(connections)),
        }
    }

    /// Short label of the storage backend, reported by the health check.
    pub fn storage(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        let backend = if self.db.is_some() {
            "postgres"
        } else {
            "in-memory"
        };

        #[cfg(not(feature = "postgres"))]
        let backend = "in-memory";

        backend
    }
}
