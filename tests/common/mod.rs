#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{self, Body};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::util::ServiceExt; // for `oneshot`

use role_gate::authz::{CasbinEngine, PolicyEngine, PolicyError, Role};
use role_gate::config::SessionConfig;
use role_gate::directory::{StaticDirectory, UserDirectory};
use role_gate::session::{MemoryStore, SessionStore};
use role_gate::{router, AppState};

pub fn config_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config").join(file)
}

pub async fn shipped_policy() -> Arc<CasbinEngine> {
    let enforcer = CasbinEngine::load(config_path("auth_model.conf"), config_path("policy.csv"))
        .await
        .expect("shipped policy must load");
    Arc::new(enforcer)
}

/// Engine whose backing rule store is gone; every evaluation errors.
pub struct DownEngine;

#[async_trait]
impl PolicyEngine for DownEngine {
    async fn evaluate(&self, _: &Role, _: &str, _: &str) -> Result<bool, PolicyError> {
        Err(PolicyError::Evaluation("rule table unavailable".into()))
    }

    fn rule_count(&self) -> usize {
        0
    }
}

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

/// Shipped policy, seeded directory, in-memory sessions.
pub async fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new(Duration::from_secs(30 * 60)));
    let app = app_with(shipped_policy().await, store.clone(), Arc::new(StaticDirectory::seeded()));
    TestApp { app, store }
}

pub fn app_with(
    policy: Arc<dyn PolicyEngine>,
    sessions: Arc<dyn SessionStore>,
    directory: Arc<dyn UserDirectory>,
) -> Router {
    router(AppState::new(policy, sessions, directory, SessionConfig::default()))
}

pub async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>, form: Option<&str>) -> Result<Response> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match form {
        Some(form) => {
            builder = builder.header("content-type", "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };

    Ok(app.clone().oneshot(builder.body(body)?).await?)
}

/// `name=value` pair from the response's Set-Cookie header, ready to send back.
pub fn session_cookie(resp: &Response) -> Option<String> {
    resp.headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub async fn body_text(resp: Response) -> Result<String> {
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Log in by name and return the session cookie.
pub async fn login(app: &Router, name: &str) -> Result<String> {
    let resp = send(app, "POST", "/login", None, Some(&format!("name={name}"))).await?;
    assert_eq!(resp.status(), StatusCode::OK, "login as {name} failed");
    session_cookie(&resp).ok_or_else(|| anyhow::anyhow!("login did not set a cookie"))
}
