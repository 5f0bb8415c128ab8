use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;

use super::{DirectoryError, UserDirectory};
use crate::models::user::Identity;

/// Fixed in-memory user list.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: Vec<Identity>,
}

impl StaticDirectory {
    pub fn new(users: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// The three demo accounts the gateway ships with.
    pub fn seeded() -> Self {
        Self::new([
            Identity::new(1, "Admin", "admin"),
            Identity::new(2, "Sabine", "member"),
            Identity::new(3, "Sepp", "member"),
        ])
    }

    /// Load a JSON array of identities. Ids and names must be unique.
    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryError> {
        let load_error = |message: String| DirectoryError::Load {
            path: path.to_path_buf(),
            message,
        };

        let raw = std::fs::read_to_string(path).map_err(|err| load_error(err.to_string()))?;
        let users: Vec<Identity> = serde_json::from_str(&raw).map_err(|err| load_error(err.to_string()))?;

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for user in &users {
            if !ids.insert(user.id) {
                return Err(load_error(format!("duplicate user id {}", user.id)));
            }
            if !names.insert(user.name.as_str()) {
                return Err(load_error(format!("duplicate user name `{}`", user.name)));
            }
        }

        Ok(Self { users })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn exists(&self, id: i64) -> Result<bool, DirectoryError> {
        Ok(self.users.iter().any(|user| user.id == id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Identity>, DirectoryError> {
        Ok(self.users.iter().find(|user| user.name == name).cloned())
    }
}
