pub mod agents;
pub mod auth;
pub mod organizations;
pub mod tools;
pub mod users;
pub mod webhooks;

use super::dto::WelcomeResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/",
    tag = "Service",
    responses((status = 200, description = "Service banner", body = WelcomeResponse))
)]
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Glymph agents manager.".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
