use super::super::dto::{ErrorResponse, StatusResponse};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::domain::{WebhookConfig, WebhookInput, WebhookUpdate};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/webhooks/create",
    tag = "Webhooks",
    request_body = WebhookInput,
    responses(
        (status = 201, description = "Webhook stored", body = WebhookConfig),
        (status = 400, description = "Invalid webhook", body = ErrorResponse),
        (status = 404, description = "Owning tool does not exist", body = ErrorResponse),
        (status = 409, description = "Tool already owns a webhook", body = ErrorResponse)
    )
)]
pub async fn create_webhook(
    State(state): State<Arc<ServerState>>,
    Json(input): Json<WebhookInput>,
) -> Result<(StatusCode, Json<WebhookConfig>), ApiError> {
    let webhook = state.catalog().create_webhook(input).await?;
    Ok((StatusCode::CREATED, Json(webhook.redacted())))
}

#[utoipa::path(
    get,
    path = "/webhooks/list",
    tag = "Webhooks",
    responses((status = 200, description = "All webhooks", body = [WebhookConfig]))
)]
pub async fn list_webhooks(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<WebhookConfig>>, ApiError> {
    let webhooks = state.catalog().list_webhooks().await?;
    Ok(Json(webhooks.iter().map(WebhookConfig::redacted).collect()))
}

#[utoipa::path(
    get,
    path = "/webhooks/details/{id}",
    tag = "Webhooks",
    params(("id" = String, Path, description = "Webhook id")),
    responses(
        (status = 200, description = "Webhook", body = WebhookConfig),
        (status = 404, description = "Unknown webhook", body = ErrorResponse)
    )
)]
pub async fn webhook_details(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<WebhookConfig>, ApiError> {
    Ok(Json(state.catalog().webhook(&id).await?.redacted()))
}

#[utoipa::path(
    put,
    path = "/webhooks/update/{id}",
    tag = "Webhooks",
    params(("id" = String, Path, description = "Webhook id")),
    request_body = WebhookUpdate,
    responses(
        (status = 200, description = "Updated webhook", body = WebhookConfig),
        (status = 400, description = "Invalid webhook", body = ErrorResponse),
        (status = 404, description = "Unknown webhook", body = ErrorResponse)
    )
)]
pub async fn update_webhook(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(update): Json<WebhookUpdate>,
) -> Result<Json<WebhookConfig>, ApiError> {
    Ok(Json(
        state.catalog().update_webhook(&id, update).await?.redacted(),
    ))
}

#[utoipa::path(
    delete,
    path = "/webhooks/delete/{id}",
    tag = "Webhooks",
    params(("id" = String, Path, description = "Webhook id")),
    responses(
        (status = 200, description = "Webhook deleted", body = StatusResponse),
        (status = 404, description = "Unknown webhook", body = ErrorResponse)
    )
)]
pub async fn delete_webhook(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.catalog().delete_webhook(&id).await?;
    Ok(Json(StatusResponse::new(format!("Webhook '{id}' deleted"))))
}

#[utoipa::path(
    post,
    path = "/webhooks/link/{id}/tool/{tool_id}",
    tag = "Webhooks",
    params(
        ("id" = String, Path, description = "Webhook id"),
        ("tool_id" = String, Path, description = "Tool id")
    ),
    responses(
        (status = 200, description = "Webhook now belongs to the tool", body = WebhookConfig),
        (status = 404, description = "Unknown webhook or tool", body = ErrorResponse),
        (status = 409, description = "Tool already owns another webhook", body = ErrorResponse)
    )
)]
pub async fn link_webhook(
    State(state): State<Arc<ServerState>>,
    Path((id, tool_id)): Path<(String, String)>,
) -> Result<Json<WebhookConfig>, ApiError> {
    Ok(Json(
        state.catalog().link_webhook(&id, &tool_id).await?.redacted(),
    ))
}
