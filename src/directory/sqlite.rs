use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{DirectoryError, UserDirectory};
use crate::models::user::Identity;

/// Users stored in the `users` table of a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteDirectory {
    pool: SqlitePool,
}

impl SqliteDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, identity: &Identity) -> Result<(), DirectoryError> {
        sqlx::query("INSERT INTO users (id, name, role) VALUES (?, ?, ?)")
            .bind(identity.id)
            .bind(&identity.name)
            .bind(&identity.role)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<i64, DirectoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl UserDirectory for SqliteDirectory {
    async fn exists(&self, id: i64) -> Result<bool, DirectoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Identity>, DirectoryError> {
        let identity = sqlx::query_as::<_, Identity>("SELECT id, name, role FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(identity)
    }
}
