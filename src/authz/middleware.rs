use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::{resolve_role, Role};
use crate::app::AppState;
use crate::errors::AppError;
use crate::session::Session;

/// Outcome of the authorization check for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Forwarded(Role),
    /// 403. Carries the cause for the log, never for the client.
    Denied(String),
    /// 500. Carries the cause for the log, never for the client.
    Failed(String),
}

impl Decision {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Decision::Forwarded(_))
    }
}

/// Resolve the role, then ask the policy engine. Stops at the first deny or failure.
pub async fn decide(state: &AppState, session: &Session, path: &str, method: &Method) -> Decision {
    let role = match resolve_role(session, state.directory.as_ref()).await {
        Ok(role) => role,
        Err(err) if err.is_forbidden() => return Decision::Denied(err.to_string()),
        Err(err) => return Decision::Failed(err.to_string()),
    };

    match state.policy.evaluate(&role, path, method.as_str()).await {
        Ok(true) => Decision::Forwarded(role),
        Ok(false) => Decision::Denied(format!("role `{role}` may not {method} {path}")),
        Err(err) => Decision::Failed(err.to_string()),
    }
}

/// Mandatory checkpoint in front of every handler.
///
/// Forwards the request untouched on success. Otherwise answers 403 or 500
/// and logs why; nothing is logged for forwarded requests.
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(session) = request.extensions().get::<Session>().cloned() else {
        return AppError::internal("no session attached to request; is the session layer installed?")
            .into_response();
    };

    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let rejection = match decide(&state, &session, &path, &method).await {
        Decision::Forwarded(_) => return next.run(request).await,
        Decision::Denied(cause) => AppError::forbidden(cause),
        Decision::Failed(cause) => AppError::internal(cause),
    };

    let fingerprint = session.fingerprint().await;
    let span = tracing::warn_span!("authz", session = %fingerprint, %method, path = %path);
    span.in_scope(|| rejection.into_response())
}
