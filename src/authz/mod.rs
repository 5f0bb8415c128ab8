//! Authorization module - Policy Engine and Middleware
//!
//! Every request passes through the same pipeline:
//! - the role is resolved from the session (`anonymous` when absent, and
//!   `member` sessions are re-checked against the user directory)
//! - the policy engine decides whether that role may use the method on the path
//! - the middleware forwards, answers 403, or answers 500
//!
//! Policies are a casbin model file plus a CSV rule table, both loaded once
//! at startup.

mod error;
mod evaluator;
mod middleware;
mod policy;
mod resolver;

pub use error::PolicyError;
pub use evaluator::PolicyEngine;
pub use middleware::{authorize, decide, Decision};
pub use policy::CasbinEngine;
pub use resolver::{resolve_role, ResolveError};

use std::fmt;

/// Well-known role names
pub mod roles {
    pub const ANONYMOUS: &str = "anonymous";
    pub const MEMBER: &str = "member";
    pub const ADMIN: &str = "admin";
}

/// A caller's privilege class. Open-ended: the loaded policy decides which
/// roles mean anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn anonymous() -> Self {
        Self::new(roles::ANONYMOUS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == roles::ANONYMOUS
    }

    /// Members assert a persistent user id that must still exist.
    pub fn is_member(&self) -> bool {
        self.0 == roles::MEMBER
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
