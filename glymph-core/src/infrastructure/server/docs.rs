use super::dto::{
    AssociationResponse, CreatedResponse, ErrorResponse, LoginRequest, MemberRequest,
    PasswordResetConfirm, PasswordResetRequest, PermissionAssignment, PermissionInput,
    RefreshRequest, RoleAssignment, RoleInput, StatusResponse, TokenRequest, TransferOwnership,
    UseAgentRequest, UserPermissions, WelcomeResponse,
};
use super::routes;
use crate::agent::AgentReply;
use crate::auth::{Registration, TokenPair};
use crate::domain::{
    AgentConfig, AgentConfigInput, AgentUpdate, HttpMethod, InputLocation, LlmParams, NewUser,
    Organization, OrganizationInput, OrganizationUpdate, Permission, Role, ToolConfig,
    ToolConfigInput, ToolInvocation, ToolUpdate, User, UserUpdate, WebhookConfig, WebhookInput,
    WebhookUpdate,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::welcome,
        routes::agents::create_agent,
        routes::agents::use_agent,
        routes::agents::list_agents,
        routes::agents::get_agent,
        routes::agents::update_agent,
        routes::agents::delete_agent,
        routes::agents::agent_tools,
        routes::agents::associate_tools,
        routes::agents::unassociate_tools,
        routes::tools::create_tool,
        routes::tools::list_tools,
        routes::tools::tool_details,
        routes::tools::update_tool,
        routes::tools::delete_tool,
        routes::tools::duplicate_tool,
        routes::tools::activate_tool,
        routes::tools::deactivate_tool,
        routes::tools::tool_webhooks,
        routes::webhooks::create_webhook,
        routes::webhooks::list_webhooks,
        routes::webhooks::webhook_details,
        routes::webhooks::update_webhook,
        routes::webhooks::delete_webhook,
        routes::webhooks::link_webhook,
        routes::auth::register,
        routes::auth::login,
        routes::auth::refresh,
        routes::auth::activate,
        routes::auth::request_password_reset,
        routes::auth::reset_password,
        routes::auth::logout,
        routes::users::list_users,
        routes::users::get_user,
        routes::users::update_user,
        routes::users::delete_user,
        routes::users::assign_role,
        routes::users::remove_role,
        routes::users::user_permissions,
        routes::users::list_roles,
        routes::users::create_role,
        routes::users::grant_permission,
        routes::users::list_permissions,
        routes::users::create_permission,
        routes::organizations::list_organizations,
        routes::organizations::create_organization,
        routes::organizations::get_organization,
        routes::organizations::update_organization,
        routes::organizations::add_member,
        routes::organizations::remove_member,
        routes::organizations::transfer_ownership
    ),
    components(
        schemas(
            AgentConfig,
            AgentConfigInput,
            AgentUpdate,
            AgentReply,
            LlmParams,
            ToolConfig,
            ToolConfigInput,
            ToolInvocation,
            ToolUpdate,
            HttpMethod,
            InputLocation,
            WebhookConfig,
            WebhookInput,
            WebhookUpdate,
            User,
            NewUser,
            UserUpdate,
            Role,
            Permission,
            Organization,
            OrganizationInput,
            OrganizationUpdate,
            Registration,
            TokenPair,
            ErrorResponse,
            StatusResponse,
            WelcomeResponse,
            CreatedResponse,
            UseAgentRequest,
            AssociationResponse,
            LoginRequest,
            RefreshRequest,
            TokenRequest,
            PasswordResetRequest,
            PasswordResetConfirm,
            RoleInput,
            PermissionInput,
            RoleAssignment,
            PermissionAssignment,
            UserPermissions,
            MemberRequest,
            TransferOwnership
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Service", description = "Service banner"),
        (name = "Agents", description = "Agent configurations and invocation"),
        (name = "Tools", description = "Outbound HTTP tools agents may call"),
        (name = "Webhooks", description = "Notification endpoints owned by tools"),
        (name = "Auth", description = "Registration, login and token lifecycle"),
        (name = "Users", description = "Accounts and their roles"),
        (name = "Roles", description = "Role and permission catalogue"),
        (name = "Organizations", description = "Organizations and membership")
    )
)]
pub(super) struct ApiDoc;
