mod common;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::StatusCode;

use role_gate::directory::StaticDirectory;
use role_gate::session::{keys, MemoryStore, SessionError, SessionStore, SessionToken, SessionValue};

use common::{app_with, body_text, login, send, session_cookie, shipped_policy, test_app, DownEngine};

struct DownStore;

#[async_trait]
impl SessionStore for DownStore {
    async fn get(&self, _: &SessionToken, _: &str) -> Result<Option<SessionValue>, SessionError> {
        Err(SessionError::Backend("connection refused".into()))
    }

    async fn put(&self, _: &SessionToken, _: &str, _: SessionValue) -> Result<(), SessionError> {
        Err(SessionError::Backend("connection refused".into()))
    }

    async fn regenerate_token(&self, _: &SessionToken) -> Result<SessionToken, SessionError> {
        Err(SessionError::Backend("connection refused".into()))
    }

    async fn renew(&self, _: &SessionToken) -> Result<SessionToken, SessionError> {
        Err(SessionError::Backend("connection refused".into()))
    }
}

#[tokio::test]
async fn admin_reaches_admin_stuff() -> Result<()> {
    let t = test_app().await;
    let cookie = login(&t.app, "Admin").await?;

    let resp = send(&t.app, "GET", "/admin/stuff", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await?, "I'm an Admin!");

    Ok(())
}

#[tokio::test]
async fn member_is_forbidden_from_admin_stuff() -> Result<()> {
    let t = test_app().await;
    let cookie = login(&t.app, "Sabine").await?;

    let resp = send(&t.app, "GET", "/admin/stuff", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(resp).await?, "FORBIDDEN");

    Ok(())
}

#[tokio::test]
async fn member_reads_their_own_session() -> Result<()> {
    let t = test_app().await;
    let cookie = login(&t.app, "Sabine").await?;

    let resp = send(&t.app, "GET", "/member/current", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await?, "User with ID: 2");

    let resp = send(&t.app, "GET", "/member/role", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await?, "User with Role: member");

    Ok(())
}

#[tokio::test]
async fn anonymous_requests_are_checked_like_any_role() -> Result<()> {
    let t = test_app().await;

    let resp = send(&t.app, "GET", "/member/current", None, None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(resp).await?, "FORBIDDEN");

    let resp = send(&t.app, "POST", "/logout", None, None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(&t.app, "GET", "/api/health", None, None).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn unrouted_paths_still_pass_the_check() -> Result<()> {
    let t = test_app().await;

    // no rule for anonymous: denied before routing
    let resp = send(&t.app, "GET", "/does/not/exist", None, None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // admin may go anywhere, so the fallback answers
    let cookie = login(&t.app, "Admin").await?;
    let resp = send(&t.app, "GET", "/does/not/exist", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn stale_member_session_is_forbidden() -> Result<()> {
    let t = test_app().await;

    // a member session whose user has since vanished from the directory
    let token = SessionToken::generate();
    t.store.put_string(&token, keys::ROLE, "member").await?;
    t.store.put_int(&token, keys::USER_ID, 999).await?;
    let cookie = format!("session={}", token.as_str());

    let resp = send(&t.app, "GET", "/member/current", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(resp).await?, "FORBIDDEN");

    Ok(())
}

#[tokio::test]
async fn admin_sessions_are_not_revalidated() -> Result<()> {
    let t = test_app().await;

    let token = SessionToken::generate();
    t.store.put_string(&token, keys::ROLE, "admin").await?;
    t.store.put_int(&token, keys::USER_ID, 999).await?;
    let cookie = format!("session={}", token.as_str());

    let resp = send(&t.app, "GET", "/admin/stuff", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn forwarded_requests_do_not_set_cookies() -> Result<()> {
    let t = test_app().await;
    let cookie = login(&t.app, "Sabine").await?;

    let resp = send(&t.app, "GET", "/member/role", Some(&cookie), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).is_none());

    Ok(())
}

#[tokio::test]
async fn unreadable_session_is_an_error_not_a_denial() -> Result<()> {
    let app = app_with(shipped_policy().await, Arc::new(DownStore), Arc::new(StaticDirectory::seeded()));

    let resp = send(&app, "GET", "/api/health", None, None).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await?, "ERROR");

    Ok(())
}

#[tokio::test]
async fn failing_policy_engine_is_an_error_not_a_denial() -> Result<()> {
    let store = Arc::new(MemoryStore::new(std::time::Duration::from_secs(60)));
    let app = app_with(Arc::new(DownEngine), store, Arc::new(StaticDirectory::seeded()));

    let resp = send(&app, "GET", "/api/health", None, None).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await?, "ERROR");

    Ok(())
}
