use super::super::dto::{ErrorResponse, StatusResponse};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::domain::{ToolConfig, ToolConfigInput, ToolUpdate, WebhookConfig};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/tools/create",
    tag = "Tools",
    request_body = ToolConfigInput,
    responses(
        (status = 201, description = "Tool stored, with its webhook when `webhook_url` was given", body = ToolConfig),
        (status = 400, description = "Invalid tool", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
pub async fn create_tool(
    State(state): State<Arc<ServerState>>,
    Json(input): Json<ToolConfigInput>,
) -> Result<(StatusCode, Json<ToolConfig>), ApiError> {
    let tool = state.catalog().create_tool(input).await?;
    Ok((StatusCode::CREATED, Json(tool.redacted())))
}

#[utoipa::path(
    get,
    path = "/tools/list",
    tag = "Tools",
    responses((status = 200, description = "All tools", body = [ToolConfig]))
)]
pub async fn list_tools(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<ToolConfig>>, ApiError> {
    let tools = state.catalog().list_tools().await?;
    Ok(Json(tools.iter().map(ToolConfig::redacted).collect()))
}

#[utoipa::path(
    get,
    path = "/tools/details/{id}",
    tag = "Tools",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, description = "Tool", body = ToolConfig),
        (status = 404, description = "Unknown tool", body = ErrorResponse)
    )
)]
pub async fn tool_details(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<ToolConfig>, ApiError> {
    Ok(Json(state.catalog().tool(&id).await?.redacted()))
}

#[utoipa::path(
    put,
    path = "/tools/update/{id}",
    tag = "Tools",
    params(("id" = String, Path, description = "Tool id")),
    request_body = ToolUpdate,
    responses(
        (status = 200, description = "Updated tool", body = ToolConfig),
        (status = 400, description = "Invalid configuration", body = ErrorResponse),
        (status = 404, description = "Unknown tool", body = ErrorResponse)
    )
)]
pub async fn update_tool(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(update): Json<ToolUpdate>,
) -> Result<Json<ToolConfig>, ApiError> {
    Ok(Json(state.catalog().update_tool(&id, update).await?.redacted()))
}

#[utoipa::path(
    delete,
    path = "/tools/delete/{id}",
    tag = "Tools",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, description = "Tool, its webhook and its associations deleted", body = StatusResponse),
        (status = 404, description = "Unknown tool", body = ErrorResponse)
    )
)]
pub async fn delete_tool(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.catalog().delete_tool(&id).await?;
    Ok(Json(StatusResponse::new(format!("Tool '{id}' deleted"))))
}

#[utoipa::path(
    post,
    path = "/tools/duplicate/{id}",
    tag = "Tools",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 201, description = "Copy named `<name>_copy`", body = ToolConfig),
        (status = 404, description = "Unknown tool", body = ErrorResponse),
        (status = 409, description = "A copy already exists", body = ErrorResponse)
    )
)]
pub async fn duplicate_tool(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ToolConfig>), ApiError> {
    let copy = state.catalog().duplicate_tool(&id).await?;
    Ok((StatusCode::CREATED, Json(copy.redacted())))
}

#[utoipa::path(
    post,
    path = "/tools/activate/{id}",
    tag = "Tools",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, description = "Tool activated", body = ToolConfig),
        (status = 404, description = "Unknown tool", body = ErrorResponse)
    )
)]
pub async fn activate_tool(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<ToolConfig>, ApiError> {
    Ok(Json(state.catalog().set_tool_active(&id, true).await?.redacted()))
}

#[utoipa::path(
    post,
    path = "/tools/deactivate/{id}",
    tag = "Tools",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, description = "Tool deactivated", body = ToolConfig),
        (status = 404, description = "Unknown tool", body = ErrorResponse)
    )
)]
pub async fn deactivate_tool(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<ToolConfig>, ApiError> {
    Ok(Json(state.catalog().set_tool_active(&id, false).await?.redacted()))
}

#[utoipa::path(
    get,
    path = "/tools/{id}/webhooks",
    tag = "Tools",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, description = "Webhooks owned by the tool", body = [WebhookConfig]),
        (status = 404, description = "Unknown tool", body = ErrorResponse)
    )
)]
pub async fn tool_webhooks(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<WebhookConfig>>, ApiError> {
    let webhooks = state.catalog().tool_webhooks(&id).await?;
    Ok(Json(webhooks.iter().map(WebhookConfig::redacted).collect()))
}
