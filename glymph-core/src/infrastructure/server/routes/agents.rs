use super::super::dto::{
    AssociationResponse, CreatedResponse, ErrorResponse, StatusResponse, ToolIdsRequest,
    UseAgentRequest,
};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::agent::AgentReply;
use crate::domain::{AgentConfig, AgentConfigInput, AgentUpdate, ToolConfig};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    post,
    path = "/agents/create",
    tag = "Agents",
    request_body = AgentConfigInput,
    responses(
        (status = 201, description = "Agent stored", body = CreatedResponse),
        (status = 400, description = "Invalid configuration", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
pub async fn create_agent(
    State(state): State<Arc<ServerState>>,
    Json(input): Json<AgentConfigInput>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = state.agents().create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    post,
    path = "/agents/use",
    tag = "Agents",
    request_body = UseAgentRequest,
    responses(
        (status = 200, description = "Agent answer (or its fallback message)", body = AgentReply),
        (status = 400, description = "Stored configuration is invalid", body = ErrorResponse),
        (status = 404, description = "Unknown agent", body = ErrorResponse),
        (status = 502, description = "Invocation failed", body = ErrorResponse)
    )
)]
pub async fn use_agent(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<UseAgentRequest>,
) -> Result<Json<AgentReply>, ApiError> {
    info!(agent = %request.name, "Agent invocation requested");
    let reply = state
        .agents()
        .resolve_and_invoke(&request.name, &request.input_text)
        .await?;
    Ok(Json(reply))
}

#[utoipa::path(
    get,
    path = "/agents/list",
    tag = "Agents",
    responses((status = 200, description = "All agents, credentials masked", body = [AgentConfig]))
)]
pub async fn list_agents(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<AgentConfig>>, ApiError> {
    let agents = state.agents().list().await?;
    Ok(Json(agents.iter().map(AgentConfig::redacted).collect()))
}

#[utoipa::path(
    get,
    path = "/agents/{name}",
    tag = "Agents",
    params(("name" = String, Path, description = "Agent name")),
    responses(
        (status = 200, description = "Agent configuration", body = AgentConfig),
        (status = 404, description = "Unknown agent", body = ErrorResponse)
    )
)]
pub async fn get_agent(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<Json<AgentConfig>, ApiError> {
    Ok(Json(state.agents().get(&name).await?.redacted()))
}

#[utoipa::path(
    put,
    path = "/agents/{name}",
    tag = "Agents",
    params(("name" = String, Path, description = "Agent name")),
    request_body = AgentUpdate,
    responses(
        (status = 200, description = "Updated configuration", body = AgentConfig),
        (status = 400, description = "Update would leave the agent invalid", body = ErrorResponse),
        (status = 404, description = "Unknown agent", body = ErrorResponse)
    )
)]
pub async fn update_agent(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Json(update): Json<AgentUpdate>,
) -> Result<Json<AgentConfig>, ApiError> {
    Ok(Json(state.agents().update(&name, update).await?.redacted()))
}

#[utoipa::path(
    delete,
    path = "/agents/{name}",
    tag = "Agents",
    params(("name" = String, Path, description = "Agent name")),
    responses(
        (status = 200, description = "Agent deleted", body = StatusResponse),
        (status = 404, description = "Unknown agent", body = ErrorResponse)
    )
)]
pub async fn delete_agent(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.agents().delete(&name).await?;
    Ok(Json(StatusResponse::new(format!("Agent '{name}' deleted"))))
}

#[utoipa::path(
    get,
    path = "/agents/{name}/tools",
    tag = "Agents",
    params(("name" = String, Path, description = "Agent name")),
    responses(
        (status = 200, description = "Tools associated with the agent", body = [ToolConfig]),
        (status = 404, description = "Unknown agent", body = ErrorResponse)
    )
)]
pub async fn agent_tools(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ToolConfig>>, ApiError> {
    let tools = state.agents().tools(&name).await?;
    Ok(Json(tools.iter().map(ToolConfig::redacted).collect()))
}

#[utoipa::path(
    post,
    path = "/agents/{name}/tools",
    tag = "Agents",
    params(("name" = String, Path, description = "Agent name")),
    request_body = ToolIdsRequest,
    responses(
        (status = 200, description = "Tools associated", body = AssociationResponse),
        (status = 404, description = "Unknown agent, or a tool that is unknown or inactive", body = ErrorResponse)
    )
)]
pub async fn associate_tools(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Json(request): Json<ToolIdsRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    let changed = state
        .agents()
        .associate_tools(&name, &request.tool_ids)
        .await?;
    Ok(Json(AssociationResponse {
        agent: name,
        changed,
    }))
}

#[utoipa::path(
    delete,
    path = "/agents/{name}/tools",
    tag = "Agents",
    params(("name" = String, Path, description = "Agent name")),
    request_body = ToolIdsRequest,
    responses(
        (status = 200, description = "Associations removed", body = AssociationResponse),
        (status = 404, description = "Unknown agent", body = ErrorResponse)
    )
)]
pub async fn unassociate_tools(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Json(request): Json<ToolIdsRequest>,
) -> Result<Json<AssociationResponse>, ApiError> {
    let changed = state
        .agents()
        .unassociate_tools(&name, &request.tool_ids)
        .await?;
    Ok(Json(AssociationResponse {
        agent: name,
        changed,
    }))
}
