use axum::extract::State;
use axum::Form;

use crate::app::AppState;
use crate::errors::{bodies, AppError, AppResult};
use crate::models::user::LoginForm;
use crate::session::{keys, Session};

#[utoipa::path(
    post,
    path = "/login",
    tag = "Session",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Session established", body = String, example = json!("SUCCESS")),
        (status = 400, description = "Unknown user name", body = String, example = json!("WRONG_CREDENTIALS"))
    )
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<&'static str> {
    let identity = state
        .directory
        .find_by_name(&form.name)
        .await?
        .ok_or_else(|| AppError::wrong_credentials(format!("no user named `{}`", form.name)))?;

    // New token before storing anything, so a planted session id is never promoted.
    session.regenerate_token().await?;
    session.put_int(keys::USER_ID, identity.id).await?;
    session.put_string(keys::ROLE, &identity.role).await?;

    tracing::info!(user_id = identity.id, role = %identity.role, "session established");

    Ok(bodies::SUCCESS)
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Session",
    responses((status = 200, description = "Session discarded", body = String, example = json!("SUCCESS")))
)]
pub async fn logout(session: Session) -> AppResult<&'static str> {
    session.renew().await?;
    Ok(bodies::SUCCESS)
}
