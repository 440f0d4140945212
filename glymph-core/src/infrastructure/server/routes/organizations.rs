use super::super::auth::CurrentUser;
use super::super::dto::{ErrorResponse, MemberRequest, StatusResponse, TransferOwnership};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::domain::{Organization, OrganizationInput, OrganizationUpdate, User};
use crate::store::StoreError;
use crate::validation::{ValidationError, required};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::info;

async fn load(state: &ServerState, id: i64) -> Result<Organization, ApiError> {
    Ok(state
        .store()
        .organization(id)
        .await?
        .ok_or_else(|| StoreError::not_found("organization", id))?)
}

async fn require_owner_or_admin(
    state: &ServerState,
    organization: &Organization,
    user: &User,
    action: &str,
) -> Result<(), ApiError> {
    if organization.owner_id == user.id || state.auth().is_admin(user.id).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Only the owner of '{}' or an admin may {action}.",
            organization.name
        )))
    }
}

#[utoipa::path(
    get,
    path = "/organizations",
    tag = "Organizations",
    security(("bearer" = [])),
    responses((status = 200, description = "Organizations the caller belongs to", body = [Organization]))
)]
pub async fn list_organizations(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
) -> Result<Json<Vec<Organization>>, ApiError> {
    Ok(Json(
        state.store().organizations_for_member(current.id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/organizations",
    tag = "Organizations",
    security(("bearer" = [])),
    request_body = OrganizationInput,
    responses(
        (status = 201, description = "Organization owned by the caller", body = Organization),
        (status = 400, description = "Missing name", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
pub async fn create_organization(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Json(input): Json<OrganizationInput>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    required("name", &input.name)?;
    let organization = state
        .store()
        .insert_organization(current.id, &input)
        .await?;
    info!(org_id = organization.id, owner_id = current.id, "Organization created");
    Ok((StatusCode::CREATED, Json(organization)))
}

#[utoipa::path(
    get,
    path = "/organizations/{id}",
    tag = "Organizations",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Organization", body = Organization),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Unknown organization", body = ErrorResponse)
    )
)]
pub async fn get_organization(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Organization>, ApiError> {
    let organization = load(&state, id).await?;
    if !state.store().is_member(id, current.id).await? {
        state
            .auth()
            .require_admin(current.id, "view an organization you do not belong to")
            .await?;
    }
    Ok(Json(organization))
}

#[utoipa::path(
    put,
    path = "/organizations/{id}",
    tag = "Organizations",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Organization id")),
    request_body = OrganizationUpdate,
    responses(
        (status = 200, description = "Updated organization", body = Organization),
        (status = 403, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Unknown organization", body = ErrorResponse)
    )
)]
pub async fn update_organization(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<OrganizationUpdate>,
) -> Result<Json<Organization>, ApiError> {
    let organization = load(&state, id).await?;
    require_owner_or_admin(&state, &organization, &current, "update it").await?;
    if let Some(name) = &update.name {
        required("name", name)?;
    }
    Ok(Json(state.store().update_organization(id, &update).await?))
}

#[utoipa::path(
    post,
    path = "/organizations/{id}/members",
    tag = "Organizations",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Organization id")),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member added", body = StatusResponse),
        (status = 404, description = "Unknown organization or user", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse)
    )
)]
pub async fn add_member(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<MemberRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let organization = load(&state, id).await?;
    require_owner_or_admin(&state, &organization, &current, "add members").await?;
    state.store().add_member(id, request.user_id).await?;
    info!(org_id = id, user_id = request.user_id, "Member added");
    Ok(Json(StatusResponse::new("Member added")))
}

#[utoipa::path(
    delete,
    path = "/organizations/{id}/members/{user_id}",
    tag = "Organizations",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Organization id"),
        ("user_id" = i64, Path, description = "Member to remove")
    ),
    responses(
        (status = 200, description = "Member removed", body = StatusResponse),
        (status = 400, description = "The owner cannot be removed", body = ErrorResponse),
        (status = 404, description = "Not a member", body = ErrorResponse)
    )
)]
pub async fn remove_member(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Json<StatusResponse>, ApiError> {
    let organization = load(&state, id).await?;
    require_owner_or_admin(&state, &organization, &current, "remove members").await?;
    if organization.owner_id == user_id {
        return Err(ValidationError::new(
            "user_id",
            "the owner cannot be removed; transfer ownership first",
        )
        .into());
    }
    state.store().remove_member(id, user_id).await?;
    info!(org_id = id, user_id, "Member removed");
    Ok(Json(StatusResponse::new("Member removed")))
}

#[utoipa::path(
    patch,
    path = "/organizations/{id}/transfer-ownership",
    tag = "Organizations",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Organization id")),
    request_body = TransferOwnership,
    responses(
        (status = 200, description = "Organization with its new owner", body = Organization),
        (status = 403, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Unknown organization or user", body = ErrorResponse)
    )
)]
pub async fn transfer_ownership(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<TransferOwnership>,
) -> Result<Json<Organization>, ApiError> {
    let organization = load(&state, id).await?;
    require_owner_or_admin(&state, &organization, &current, "transfer ownership").await?;
    let organization = state
        .store()
        .transfer_ownership(id, request.new_owner_id)
        .await?;
    info!(
        org_id = id,
        new_owner_id = request.new_owner_id,
        "Organization ownership transferred"
    );
    Ok(Json(organization))
}
