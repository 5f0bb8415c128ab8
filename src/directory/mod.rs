//! Lookup of known users by id or name.

pub mod memory;
pub mod sqlite;

pub use memory::StaticDirectory;
pub use sqlite::SqliteDirectory;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::models::user::Identity;

#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to load users from {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },
}

/// Read access to the set of known users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, id: i64) -> Result<bool, DirectoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Identity>, DirectoryError>;
}
