//! Accounts, roles and permissions. Every route needs an access token;
//! changing somebody else's account or the role catalogue needs `admin`.

use super::super::auth::CurrentUser;
use super::super::dto::{
    ErrorResponse, PermissionAssignment, PermissionInput, RoleAssignment, RoleInput,
    StatusResponse, UserPermissions,
};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::domain::{Permission, Role, User, UserUpdate};
use crate::store::StoreError;
use crate::validation::required;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::info;

async fn require_self_or_admin(
    state: &ServerState,
    current: &User,
    user_id: i64,
    action: &str,
) -> Result<(), ApiError> {
    if current.id != user_id {
        state.auth().require_admin(current.id, action).await?;
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All accounts", body = [User]),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    state.auth().require_admin(current.id, "list users").await?;
    Ok(Json(state.store().list_users().await?))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Account", body = User),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    require_self_or_admin(&state, &current, id, "view another user").await?;
    let user = state
        .store()
        .user(id)
        .await?
        .ok_or_else(|| StoreError::not_found("user", id))?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated account", body = User),
        (status = 403, description = "Not allowed to change this account", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    require_self_or_admin(&state, &current, id, "update another user").await?;
    if update.is_active.is_some() {
        state
            .auth()
            .require_admin(current.id, "change account activation")
            .await?;
    }
    if let Some(email) = &update.email {
        required("email", email)?;
    }
    let user = state.store().update_user(id, &update).await?;
    info!(user_id = id, "User updated");
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Account deleted", body = StatusResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
        (status = 409, description = "User still owns organizations", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.auth().require_admin(current.id, "delete user").await?;
    let owns_organizations = state
        .store()
        .organizations_for_member(id)
        .await?
        .iter()
        .any(|organization| organization.owner_id == id);
    if owns_organizations {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("User {id} still owns organizations; transfer ownership first."),
        ));
    }
    state.store().delete_user(id).await?;
    info!(user_id = id, deleted_by = current.id, "User deleted");
    Ok(Json(StatusResponse::new(format!("User {id} deleted"))))
}

#[utoipa::path(
    post,
    path = "/users/{id}/roles",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = RoleAssignment,
    responses(
        (status = 200, description = "Role assigned", body = StatusResponse),
        (status = 404, description = "Unknown user or role", body = ErrorResponse),
        (status = 409, description = "Role already assigned", body = ErrorResponse)
    )
)]
pub async fn assign_role(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<RoleAssignment>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.auth().require_admin(current.id, "assign roles").await?;
    state.store().assign_role(id, request.role_id).await?;
    info!(user_id = id, role_id = request.role_id, "Role assigned");
    Ok(Json(StatusResponse::new("Role assigned")))
}

#[utoipa::path(
    delete,
    path = "/users/{id}/roles/{role_id}",
    tag = "Users",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "User id"),
        ("role_id" = i64, Path, description = "Role id")
    ),
    responses(
        (status = 200, description = "Role removed", body = StatusResponse),
        (status = 404, description = "User does not hold the role", body = ErrorResponse)
    )
)]
pub async fn remove_role(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path((id, role_id)): Path<(i64, i64)>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.auth().require_admin(current.id, "remove roles").await?;
    state.store().remove_role(id, role_id).await?;
    info!(user_id = id, role_id, "Role removed");
    Ok(Json(StatusResponse::new("Role removed")))
}

#[utoipa::path(
    get,
    path = "/users/{id}/permissions",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Roles and the permissions they grant", body = UserPermissions),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
pub async fn user_permissions(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserPermissions>, ApiError> {
    require_self_or_admin(&state, &current, id, "view another user's permissions").await?;
    if state.store().user(id).await?.is_none() {
        return Err(StoreError::not_found("user", id).into());
    }
    Ok(Json(UserPermissions {
        user_id: id,
        roles: state.store().user_role_names(id).await?,
        permissions: state.store().user_permissions(id).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    security(("bearer" = [])),
    responses((status = 200, description = "All roles", body = [Role]))
)]
pub async fn list_roles(
    State(state): State<Arc<ServerState>>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Role>>, ApiError> {
    Ok(Json(state.store().list_roles().await?))
}

#[utoipa::path(
    post,
    path = "/roles",
    tag = "Roles",
    security(("bearer" = [])),
    request_body = RoleInput,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 409, description = "Role already exists", body = ErrorResponse)
    )
)]
pub async fn create_role(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Json(input): Json<RoleInput>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    state.auth().require_admin(current.id, "create roles").await?;
    required("name", &input.name)?;
    let role = state
        .store()
        .insert_role(input.name.trim(), input.description.as_deref())
        .await?;
    info!(role = %role.name, "Role created");
    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    post,
    path = "/roles/{id}/permissions",
    tag = "Roles",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Role id")),
    request_body = PermissionAssignment,
    responses(
        (status = 200, description = "Permission granted to the role", body = StatusResponse),
        (status = 404, description = "Unknown role or permission", body = ErrorResponse),
        (status = 409, description = "Permission already granted", body = ErrorResponse)
    )
)]
pub async fn grant_permission(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<PermissionAssignment>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .auth()
        .require_admin(current.id, "grant permissions")
        .await?;
    state
        .store()
        .assign_permission(id, request.permission_id)
        .await?;
    Ok(Json(StatusResponse::new("Permission granted")))
}

#[utoipa::path(
    get,
    path = "/permissions",
    tag = "Roles",
    security(("bearer" = [])),
    responses((status = 200, description = "All permissions", body = [Permission]))
)]
pub async fn list_permissions(
    State(state): State<Arc<ServerState>>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Permission>>, ApiError> {
    Ok(Json(state.store().list_permissions().await?))
}

#[utoipa::path(
    post,
    path = "/permissions",
    tag = "Roles",
    security(("bearer" = [])),
    request_body = PermissionInput,
    responses(
        (status = 201, description = "Permission created", body = Permission),
        (status = 409, description = "Permission already exists", body = ErrorResponse)
    )
)]
pub async fn create_permission(
    State(state): State<Arc<ServerState>>,
    CurrentUser(current): CurrentUser,
    Json(input): Json<PermissionInput>,
) -> Result<(StatusCode, Json<Permission>), ApiError> {
    state
        .auth()
        .require_admin(current.id, "create permissions")
        .await?;
    required("name", &input.name)?;
    let permission = state
        .store()
        .insert_permission(input.name.trim(), input.description.as_deref())
        .await?;
    info!(permission = %permission.name, "Permission created");
    Ok((StatusCode::CREATED, Json(permission)))
}
