#[utoipa::path(
    get,
    path = "/admin/stuff",
    tag = "Demo",
    responses((status = 200, description = "Only reachable by admins", body = String))
)]
pub async fn stuff() -> &'static str {
    "I'm an Admin!"
}
