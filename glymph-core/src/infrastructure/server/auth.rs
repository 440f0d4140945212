//! Bearer-token checks for protected routes.

use super::error::ApiError;
use super::state::ServerState;
use crate::auth::AuthError;
use crate::domain::User;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

/// Token from an `Authorization: Bearer <token>` header.
pub(super) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// The active user behind the request's access token.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<ServerState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(CurrentUser(user.clone()));
        }
        let token = bearer_token(&parts.headers)?;
        let user = state.auth().current_user(token).await?;
        Ok(CurrentUser(user))
    }
}

/// Rejects requests without a valid access token and stashes the user for
/// [`CurrentUser`].
pub(super) async fn require_auth(
    State(state): State<Arc<ServerState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let user = state.auth().current_user(token).await?;
    debug!(user_id = user.id, path = %request.uri().path(), "Authenticated request");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
