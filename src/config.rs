use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

const DEFAULT_MODEL_PATH: &str = "config/auth_model.conf";
const DEFAULT_POLICY_PATH: &str = "config/policy.csv";
const DEFAULT_COOKIE_NAME: &str = "session";
const DEFAULT_IDLE_MINUTES: u64 = 30;
const DEFAULT_PORT: u16 = 8080;

/// How sessions are carried between requests and how long they live idle.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_MINUTES * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub model_path: PathBuf,
    pub policy_path: PathBuf,
    pub session: SessionConfig,
    /// When set, users are read from this SQLite database instead of the built-in list.
    pub database_url: Option<String>,
    /// JSON file with `[{"id": .., "name": .., "role": ..}]`, used when no database is configured.
    pub users_file: Option<PathBuf>,
    pub port: u16,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let model_path = env_path("POLICY_MODEL_PATH", DEFAULT_MODEL_PATH);
        let policy_path = env_path("POLICY_PATH", DEFAULT_POLICY_PATH);

        let cookie_name = non_empty_var("SESSION_COOKIE_NAME").unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());
        if !cookie_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(AppError::configuration("SESSION_COOKIE_NAME may only contain [A-Za-z0-9_-]"));
        }

        let idle_timeout = idle_timeout(std::env::var("SESSION_IDLE_MINUTES").ok().as_deref())?;

        let port = std::env::var("APP_PORT")
            .map(|val| val.parse::<u16>())
            .unwrap_or(Ok(DEFAULT_PORT))
            .map_err(|_| AppError::configuration("APP_PORT must be a valid port number"))?;

        Ok(Self {
            model_path,
            policy_path,
            session: SessionConfig {
                cookie_name,
                idle_timeout,
            },
            database_url: non_empty_var("DATABASE_URL"),
            users_file: non_empty_var("USERS_FILE").map(PathBuf::from),
            port,
        })
    }
}

/// Load `.env` from the working directory, falling back to the crate-local one.
pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

/// `SESSION_IDLE_MINUTES` as a duration; unset means the default.
fn idle_timeout(raw: Option<&str>) -> Result<Duration, AppError> {
    let minutes = match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::configuration("SESSION_IDLE_MINUTES must be a valid integer"))?,
        None => DEFAULT_IDLE_MINUTES,
    };
    if minutes == 0 {
        return Err(AppError::configuration("SESSION_IDLE_MINUTES must be greater than zero"));
    }

    let secs = minutes
        .checked_mul(60)
        .ok_or_else(|| AppError::configuration("SESSION_IDLE_MINUTES is too large"))?;
    Ok(Duration::from_secs(secs))
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    non_empty_var(key).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(default))
}
