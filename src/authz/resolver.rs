use super::Role;
use crate::directory::{DirectoryError, UserDirectory};
use crate::session::{keys, Session, SessionError};

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("failed to read session: {0}")]
    Session(#[from] SessionError),
    #[error("failed to query user directory: {0}")]
    Directory(#[from] DirectoryError),
    #[error("session user {user_id} does not exist")]
    StaleIdentity { user_id: i64 },
    #[error("member session carries no user id")]
    MissingIdentity,
}

impl ResolveError {
    /// The caller has a session, but it no longer maps to a valid identity.
    /// Everything else is an infrastructure fault.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ResolveError::StaleIdentity { .. } | ResolveError::MissingIdentity)
    }
}

/// Work out which role the request acts under.
///
/// No role in the session means `anonymous`. A `member` session is only
/// trusted while its user id still exists in the directory; other roles are
/// taken from the session as-is.
pub async fn resolve_role(session: &Session, directory: &dyn UserDirectory) -> Result<Role, ResolveError> {
    let role = match session.get_string(keys::ROLE).await? {
        Some(name) if !name.is_empty() => Role::new(name),
        _ => Role::anonymous(),
    };

    if role.is_member() {
        let user_id = session
            .get_int(keys::USER_ID)
            .await?
            .ok_or(ResolveError::MissingIdentity)?;

        if !directory.exists(user_id).await? {
            return Err(ResolveError::StaleIdentity { user_id });
        }
    }

    Ok(role)
}
