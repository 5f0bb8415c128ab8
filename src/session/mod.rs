//! Session state keyed by an opaque token.
//!
//! [`SessionStore`] is the storage seam; [`MemoryStore`] is the in-process
//! implementation. [`Session`] is the per-request handle the cookie middleware
//! attaches to every request.

mod handle;
pub mod memory;
mod middleware;

pub use handle::Session;
pub use memory::{spawn_sweeper, MemoryStore};
pub use middleware::{manage, read_cookie};

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

/// Well-known session keys
pub mod keys {
    pub const USER_ID: &str = "userID";
    pub const ROLE: &str = "role";
}

/// Opaque session identifier: 32 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    const LEN: usize = 32;

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accepts only well-formed tokens; anything else is treated as "no session".
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == Self::LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn fingerprint(&self) -> String {
        crate::utils::fingerprint(&self.0)
    }
}

// Tokens are bearer secrets; keep them out of debug output.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.fingerprint()).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValue {
    Int(i64),
    Str(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("session value `{key}` is not {expected}")]
    TypeMismatch { key: String, expected: &'static str },
    #[error("session backend unavailable: {0}")]
    Backend(String),
}

/// Storage for session values.
///
/// Implementations synchronize internally; callers never hold their own locks.
/// Reads of an unknown or expired token behave like an empty session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: &SessionToken, key: &str) -> Result<Option<SessionValue>, SessionError>;

    async fn put(&self, token: &SessionToken, key: &str, value: SessionValue) -> Result<(), SessionError>;

    /// Move the session's values under a freshly issued token. The old token stops working.
    async fn regenerate_token(&self, token: &SessionToken) -> Result<SessionToken, SessionError>;

    /// Destroy the session and issue a fresh, empty one.
    async fn renew(&self, token: &SessionToken) -> Result<SessionToken, SessionError>;

    async fn get_string(&self, token: &SessionToken, key: &str) -> Result<Option<String>, SessionError> {
        match self.get(token, key).await? {
            None => Ok(None),
            Some(SessionValue::Str(value)) => Ok(Some(value)),
            Some(SessionValue::Int(_)) => Err(SessionError::TypeMismatch {
                key: key.to_string(),
                expected: "a string",
            }),
        }
    }

    async fn get_int(&self, token: &SessionToken, key: &str) -> Result<Option<i64>, SessionError> {
        match self.get(token, key).await? {
            None => Ok(None),
            Some(SessionValue::Int(value)) => Ok(Some(value)),
            Some(SessionValue::Str(_)) => Err(SessionError::TypeMismatch {
                key: key.to_string(),
                expected: "an integer",
            }),
        }
    }

    async fn put_string(&self, token: &SessionToken, key: &str, value: &str) -> Result<(), SessionError> {
        self.put(token, key, SessionValue::Str(value.to_string())).await
    }

    async fn put_int(&self, token: &SessionToken, key: &str, value: i64) -> Result<(), SessionError> {
        self.put(token, key, SessionValue::Int(value)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_parse_back() {
        let token = SessionToken::generate();
        assert_eq!(SessionToken::parse(token.as_str()), Some(token));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(SessionToken::parse("").is_none());
        assert!(SessionToken::parse("attacker-chosen").is_none());
        assert!(SessionToken::parse("0123456789ABCDEF0123456789ABCDEF").is_none());
        assert!(SessionToken::parse("0123456789abcdef0123456789abcdef0").is_none());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let token = SessionToken::generate();
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains(token.as_str()));
    }
}
