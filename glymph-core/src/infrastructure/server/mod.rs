//! REST surface: axum routes over the agent, catalog and auth services,
//! documented through utoipa.

mod auth;
mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use auth::CurrentUser;
pub use dto::ErrorResponse;
pub use error::{ApiError, ServerError};
pub use router::{router, serve, serve_with_listener};
pub use state::ServerState;

use utoipa::OpenApi;

/// The OpenAPI document served at `/api-doc/openapi.json`.
pub fn openapi() -> utoipa::openapi::OpenApi {
    docs::ApiDoc::openapi()
}
