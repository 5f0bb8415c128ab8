use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A user known to the directory. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub role: String,
}

impl Identity {
    pub fn new(id: i64, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    /// A missing field is treated like an unknown name.
    #[serde(default)]
    #[schema(example = "Sabine")]
    pub name: String,
}
