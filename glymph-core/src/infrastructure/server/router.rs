use super::auth::require_auth;
use super::error::ServerError;
use super::routes::{self, agents, auth, organizations, tools, users, webhooks};
use super::state::ServerState;
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post, put};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

#[cfg(feature = "swagger-ui")]
use super::docs::ApiDoc;
#[cfg(feature = "swagger-ui")]
use utoipa::OpenApi;
#[cfg(feature = "swagger-ui")]
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(%origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Agent, tool and webhook management.
fn resource_routes(state: &Arc<ServerState>) -> Router<Arc<ServerState>> {
    let router = Router::new()
        .route("/agents/create", post(agents::create_agent))
        .route("/agents/use", post(agents::use_agent))
        .route("/agents/list", get(agents::list_agents))
        .route(
            "/agents/{name}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route(
            "/agents/{name}/tools",
            get(agents::agent_tools)
                .post(agents::associate_tools)
                .delete(agents::unassociate_tools),
        )
        .route("/tools/create", post(tools::create_tool))
        .route("/tools/list", get(tools::list_tools))
        .route("/tools/details/{id}", get(tools::tool_details))
        .route("/tools/update/{id}", put(tools::update_tool))
        .route("/tools/delete/{id}", axum::routing::delete(tools::delete_tool))
        .route("/tools/duplicate/{id}", post(tools::duplicate_tool))
        .route("/tools/activate/{id}", post(tools::activate_tool))
        .route("/tools/deactivate/{id}", post(tools::deactivate_tool))
        .route("/tools/{id}/webhooks", get(tools::tool_webhooks))
        .route("/webhooks/create", post(webhooks::create_webhook))
        .route("/webhooks/list", get(webhooks::list_webhooks))
        .route("/webhooks/details/{id}", get(webhooks::webhook_details))
        .route("/webhooks/update/{id}", put(webhooks::update_webhook))
        .route(
            "/webhooks/delete/{id}",
            axum::routing::delete(webhooks::delete_webhook),
        )
        .route(
            "/webhooks/link/{id}/tool/{tool_id}",
            post(webhooks::link_webhook),
        );

    if state.protect_resources() {
        router.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
    } else {
        router
    }
}

/// Auth, accounts, roles and organizations. Handlers that need a caller take
/// the `CurrentUser` extractor.
fn identity_routes() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/activate", post(auth::activate))
        .route(
            "/auth/request-password-reset",
            post(auth::request_password_reset),
        )
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/auth/logout", post(auth::logout))
        .route("/users", get(users::list_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/roles", post(users::assign_role))
        .route(
            "/users/{id}/roles/{role_id}",
            axum::routing::delete(users::remove_role),
        )
        .route("/users/{id}/permissions", get(users::user_permissions))
        .route("/roles", get(users::list_roles).post(users::create_role))
        .route("/roles/{id}/permissions", post(users::grant_permission))
        .route(
            "/permissions",
            get(users::list_permissions).post(users::create_permission),
        )
        .route(
            "/organizations",
            get(organizations::list_organizations).post(organizations::create_organization),
        )
        .route(
            "/organizations/{id}",
            get(organizations::get_organization).put(organizations::update_organization),
        )
        .route("/organizations/{id}/members", post(organizations::add_member))
        .route(
            "/organizations/{id}/members/{user_id}",
            axum::routing::delete(organizations::remove_member),
        )
        .route(
            "/organizations/{id}/transfer-ownership",
            axum::routing::patch(organizations::transfer_ownership),
        )
}

/// Full application router over the given state.
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = cors_layer(state.cors_origins());

    let app = Router::new()
        .route("/", get(routes::welcome))
        .merge(resource_routes(&state))
        .merge(identity_routes());

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    app.layer(cors).with_state(state)
}

pub async fn serve(state: Arc<ServerState>, addr: SocketAddr) -> Result<(), ServerError> {
    info!(%addr, "Binding REST server");
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve_with_listener(state, listener).await
}

/// Serve on an already bound listener, e.g. one bound to port 0 in tests.
pub async fn serve_with_listener(
    state: Arc<ServerState>,
    listener: TcpListener,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    let app = router(state);
    info!(%addr, "REST server ready to accept connections");
    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}
