use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::authz::{self, CasbinEngine, PolicyEngine};
use crate::config::{GatewayConfig, SessionConfig};
use crate::directory::{SqliteDirectory, StaticDirectory, UserDirectory};
use crate::docs;
use crate::routes::{admin, auth, health, member};
use crate::session::{self, MemoryStore, SessionStore};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<dyn PolicyEngine>,
    pub sessions: Arc<dyn SessionStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub session_config: Arc<SessionConfig>,
}

impl AppState {
    pub fn new(
        policy: Arc<dyn PolicyEngine>,
        sessions: Arc<dyn SessionStore>,
        directory: Arc<dyn UserDirectory>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            policy,
            sessions,
            directory,
            session_config: Arc::new(session_config),
        }
    }
}

/// Every route, wrapped by the authorization check.
///
/// The authorization layer is applied after all routes and the fallback are
/// registered, so nothing is reachable without passing it. The session layer
/// sits outside it because the check reads the session.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/member/current", get(member::current))
        .route("/member/role", get(member::role))
        .route("/admin/stuff", get(admin::stuff))
        .route("/api/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), authz::authorize))
        .layer(middleware::from_fn_with_state(state.clone(), session::manage))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Load policy, directory and session store from configuration.
///
/// Policy load failures are returned, not papered over: the process must not
/// start without a valid policy.
pub async fn build_state(config: &GatewayConfig) -> anyhow::Result<AppState> {
    let enforcer = CasbinEngine::load(&config.model_path, &config.policy_path)
        .await
        .with_context(|| {
            format!(
                "failed to load policy from {} and {}",
                config.model_path.display(),
                config.policy_path.display()
            )
        })?;
    tracing::info!(rules = enforcer.rule_count(), "policy loaded");

    let directory: Arc<dyn UserDirectory> = match (&config.database_url, &config.users_file) {
        (Some(url), _) => {
            let pool = crate::db::init(url).await?;
            tracing::info!("using sqlite user directory");
            Arc::new(SqliteDirectory::new(pool))
        }
        (None, Some(path)) => {
            let directory = StaticDirectory::from_json_file(path)?;
            tracing::info!(users = directory.len(), "using user list from {}", path.display());
            Arc::new(directory)
        }
        (None, None) => Arc::new(StaticDirectory::seeded()),
    };

    let store = Arc::new(MemoryStore::new(config.session.idle_timeout));
    session::spawn_sweeper(store.clone(), SESSION_SWEEP_INTERVAL);

    Ok(AppState::new(
        Arc::new(enforcer),
        store,
        directory,
        config.session.clone(),
    ))
}

pub async fn create_app(config: &GatewayConfig) -> anyhow::Result<Router> {
    let state = build_state(config).await?;
    Ok(router(state))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "NOT_FOUND")
}
