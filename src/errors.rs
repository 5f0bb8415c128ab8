use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::authz::PolicyError;
use crate::directory::DirectoryError;
use crate::session::SessionError;

pub type AppResult<T> = Result<T, AppError>;

/// Stable machine-readable response bodies. Existing clients match on these.
pub mod bodies {
    pub const SUCCESS: &str = "SUCCESS";
    pub const ERROR: &str = "ERROR";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const WRONG_CREDENTIALS: &str = "WRONG_CREDENTIALS";
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("wrong credentials: {0}")]
    WrongCredentials(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("session store error: {0}")]
    Session(#[from] SessionError),
    #[error("user directory error: {0}")]
    Directory(#[from] DirectoryError),
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn wrong_credentials(message: impl Into<String>) -> Self {
        Self::WrongCredentials(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::WrongCredentials(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_)
            | AppError::Session(_)
            | AppError::Directory(_)
            | AppError::Policy(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed body token written for this error. Never carries the cause.
    pub fn body(&self) -> &'static str {
        match self {
            AppError::Forbidden(_) => bodies::FORBIDDEN,
            AppError::WrongCredentials(_) => bodies::WRONG_CREDENTIALS,
            _ => bodies::ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), cause = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), cause = %self, "request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body(),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value.to_string())
    }
}
