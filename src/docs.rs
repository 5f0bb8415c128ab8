use axum::Json;
use utoipa::OpenApi;

use crate::models::user::LoginForm;
use crate::routes::{self, health::HealthResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::auth::login,
        routes::auth::logout,
        routes::member::current,
        routes::member::role,
        routes::admin::stuff,
        routes::health::health
    ),
    components(schemas(LoginForm, HealthResponse)),
    tags(
        (name = "Session", description = "Login and logout"),
        (name = "Demo", description = "Handlers behind the authorization check"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub fn build_openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(build_openapi())
}
