use super::super::auth::bearer_token;
use super::super::dto::{
    ErrorResponse, LoginRequest, PasswordResetConfirm, PasswordResetRequest, RefreshRequest,
    StatusResponse, TokenRequest,
};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::auth::{Registration, TokenPair};
use crate::domain::{NewUser, User};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;

const RESET_REQUESTED: &str = "If the email exists, a password reset link has been sent.";

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = NewUser,
    responses(
        (status = 201, description = "Inactive account and its activation token", body = Registration),
        (status = 400, description = "Invalid username, email or password", body = ErrorResponse),
        (status = 409, description = "Username or email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<ServerState>>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let registration = state.auth().register(new_user).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPair),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account not activated", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = state
        .auth()
        .login(request.username.trim(), &request.password)
        .await?;
    Ok(Json(pair))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "A new token pair; the old refresh token is revoked", body = TokenPair),
        (status = 401, description = "Invalid, expired or revoked refresh token", body = ErrorResponse)
    )
)]
pub async fn refresh(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    Ok(Json(state.auth().refresh(&request.refresh_token).await?))
}

#[utoipa::path(
    post,
    path = "/auth/activate",
    tag = "Auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Activated account", body = User),
        (status = 401, description = "Invalid or used activation token", body = ErrorResponse)
    )
)]
pub async fn activate(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.auth().activate(&request.token).await?))
}

/// Answers the same way whether or not the email is registered. Token
/// delivery is left to an out-of-band channel.
#[utoipa::path(
    post,
    path = "/auth/request-password-reset",
    tag = "Auth",
    request_body = PasswordResetRequest,
    responses((status = 200, description = "Request accepted", body = StatusResponse))
)]
pub async fn request_password_reset(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.auth().request_password_reset(&request.email).await?;
    Ok(Json(StatusResponse::new(RESET_REQUESTED)))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Auth",
    request_body = PasswordResetConfirm,
    responses(
        (status = 200, description = "Password replaced", body = StatusResponse),
        (status = 400, description = "New password too short", body = ErrorResponse),
        (status = 401, description = "Invalid or used reset token", body = ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<PasswordResetConfirm>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .auth()
        .reset_password(&request.token, &request.new_password)
        .await?;
    Ok(Json(StatusResponse::new(
        "Password has been reset. You can now log in with the new password.",
    )))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Access token revoked", body = StatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    state.auth().logout(token).await?;
    Ok(Json(StatusResponse::new("Logged out")))
}
