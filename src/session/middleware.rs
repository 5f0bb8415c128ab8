use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use super::{Session, SessionToken};
use crate::app::AppState;

/// Attach a [`Session`] to the request and write the cookie back if the
/// request changed it.
///
/// Requests without a usable cookie get a fresh token that is only persisted
/// (and sent to the client) once something is written to it.
pub async fn manage(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let config = &state.session_config;

    let token = read_cookie(request.headers(), &config.cookie_name)
        .and_then(SessionToken::parse)
        .unwrap_or_else(SessionToken::generate);

    let session = Session::new(state.sessions.clone(), token);
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if session.is_touched() {
        let token = session.token().await;
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            config.cookie_name,
            token.as_str(),
            config.idle_timeout.as_secs()
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(err) => {
                tracing::error!(session = %token.fingerprint(), error = %err, "failed to encode session cookie");
            }
        }
    }

    response
}

/// Value of the named cookie, if the request carries it.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
