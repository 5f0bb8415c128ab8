use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio::sync::RwLock;

use super::{SessionError, SessionStore, SessionToken};
use crate::errors::AppError;

/// The session bound to one request.
///
/// Cloning is cheap; clones share the current token, so a token rotated by a
/// handler is what the cookie middleware writes back.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn SessionStore>,
    token: RwLock<SessionToken>,
    touched: AtomicBool,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, token: SessionToken) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                token: RwLock::new(token),
                touched: AtomicBool::new(false),
            }),
        }
    }

    pub async fn token(&self) -> SessionToken {
        self.inner.token.read().await.clone()
    }

    pub async fn fingerprint(&self) -> String {
        self.inner.token.read().await.fingerprint()
    }

    /// Whether this request wrote to or rotated its session.
    pub fn is_touched(&self) -> bool {
        self.inner.touched.load(Ordering::Acquire)
    }

    pub async fn get_string(&self, key: &str) -> Result<Option<String>, SessionError> {
        let token = self.inner.token.read().await;
        self.inner.store.get_string(&token, key).await
    }

    pub async fn get_int(&self, key: &str) -> Result<Option<i64>, SessionError> {
        let token = self.inner.token.read().await;
        self.inner.store.get_int(&token, key).await
    }

    pub async fn put_string(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let token = self.inner.token.read().await;
        self.inner.store.put_string(&token, key, value).await?;
        self.touch();
        Ok(())
    }

    pub async fn put_int(&self, key: &str, value: i64) -> Result<(), SessionError> {
        let token = self.inner.token.read().await;
        self.inner.store.put_int(&token, key, value).await?;
        self.touch();
        Ok(())
    }

    /// Keep the session's values but move them under a new token.
    pub async fn regenerate_token(&self) -> Result<(), SessionError> {
        let mut token = self.inner.token.write().await;
        *token = self.inner.store.regenerate_token(&token).await?;
        self.touch();
        Ok(())
    }

    /// Throw the session away and continue with a fresh, empty one.
    pub async fn renew(&self) -> Result<(), SessionError> {
        let mut token = self.inner.token.write().await;
        *token = self.inner.store.renew(&token).await?;
        self.touch();
        Ok(())
    }

    fn touch(&self) {
        self.inner.touched.store(true, Ordering::Release);
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("session layer is not installed"))
    }
}
