use std::path::Path;

use casbin::{CoreApi, DefaultModel, FileAdapter, MgmtApi};

use super::PolicyError;

/// A casbin enforcer built from a model file and a CSV rule table.
///
/// Loaded once at startup and never mutated afterwards, so it is shared
/// behind an `Arc` without a lock.
pub struct CasbinEngine {
    enforcer: casbin::Enforcer,
    rule_count: usize,
}

impl CasbinEngine {
    /// Load both artifacts from disk. Any error here should stop the process.
    pub async fn load(model_path: impl AsRef<Path>, policy_path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let model_path = model_path.as_ref();
        let policy_path = policy_path.as_ref();

        let model = DefaultModel::from_file(model_path)
            .await
            .map_err(|err| PolicyError::model(model_path, err))?;

        let enforcer = casbin::Enforcer::new(model, FileAdapter::new(policy_path.to_path_buf()))
            .await
            .map_err(|err| PolicyError::rules(policy_path, err))?;
        let rule_count = enforcer.get_policy().len();

        Ok(Self { enforcer, rule_count })
    }

    /// Whether `subject` may perform `action` on `object`. No matching rule means no.
    pub fn enforce(&self, subject: &str, object: &str, action: &str) -> Result<bool, PolicyError> {
        self.enforcer
            .enforce((subject, object, action))
            .map_err(|err| PolicyError::Evaluation(err.to_string()))
    }

    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Rule rows in table order, without the leading `p`.
    pub fn rules(&self) -> Vec<Vec<String>> {
        self.enforcer.get_policy()
    }

    /// Rule rows whose subject is `role`.
    pub fn rules_for(&self, role: &str) -> Vec<Vec<String>> {
        self.enforcer.get_filtered_policy(0, vec![role.to_string()])
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;

    use super::*;

    pub const MODEL: &str = include_str!("../../config/auth_model.conf");

    pub fn config_path(file: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config").join(file)
    }

    pub async fn shipped() -> CasbinEngine {
        CasbinEngine::load(config_path("auth_model.conf"), config_path("policy.csv"))
            .await
            .unwrap()
    }

    /// Engine over an ad-hoc model and rule table written to a scratch directory.
    pub async fn engine(model: &str, rules: &str) -> CasbinEngine {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.conf");
        let policy_path = dir.path().join("policy.csv");
        std::fs::write(&model_path, model).unwrap();
        std::fs::write(&policy_path, rules).unwrap();

        CasbinEngine::load(&model_path, &policy_path).await.unwrap()
    }
}
