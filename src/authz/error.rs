use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum PolicyError {
    #[error("failed to load model from {}: {message}", .path.display())]
    Model { path: PathBuf, message: String },
    #[error("failed to load rules from {}: {message}", .path.display())]
    Rules { path: PathBuf, message: String },
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

impl PolicyError {
    pub fn model(path: &Path, cause: impl Display) -> Self {
        Self::Model {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }

    pub fn rules(path: &Path, cause: impl Display) -> Self {
        Self::Rules {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }
}
