use crate::errors::{AppError, AppResult};
use crate::session::{keys, Session};

#[utoipa::path(
    get,
    path = "/member/current",
    tag = "Demo",
    responses((status = 200, description = "User id stored in the session", body = String))
)]
pub async fn current(session: Session) -> AppResult<String> {
    let user_id = session
        .get_int(keys::USER_ID)
        .await?
        .ok_or_else(|| AppError::internal("session has no user id"))?;

    Ok(format!("User with ID: {user_id}"))
}

#[utoipa::path(
    get,
    path = "/member/role",
    tag = "Demo",
    responses((status = 200, description = "Role stored in the session", body = String))
)]
pub async fn role(session: Session) -> AppResult<String> {
    let role = session
        .get_string(keys::ROLE)
        .await?
        .ok_or_else(|| AppError::internal("session has no role"))?;

    Ok(format!("User with Role: {role}"))
}
