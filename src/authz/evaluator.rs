use async_trait::async_trait;

use super::{CasbinEngine, PolicyError, Role};

/// Policy engine trait for pluggable authorization logic
#[async_trait]
pub trait PolicyEngine: Send + Sync {
    /// Whether `role` may perform `action` on `resource`.
    ///
    /// `Ok(false)` is a denial; `Err` means the engine could not decide and
    /// must never be read as either answer.
    async fn evaluate(&self, role: &Role, resource: &str, action: &str) -> Result<bool, PolicyError>;

    /// Number of rules currently loaded.
    fn rule_count(&self) -> usize;
}

#[async_trait]
impl PolicyEngine for CasbinEngine {
    async fn evaluate(&self, role: &Role, resource: &str, action: &str) -> Result<bool, PolicyError> {
        self.enforce(role.as_str(), resource, action)
    }

    fn rule_count(&self) -> usize {
        CasbinEngine::rule_count(self)
    }
}
