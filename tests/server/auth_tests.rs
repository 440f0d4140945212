// Auth, RBAC and organization flows over HTTP

#[path = "../common/mod.rs"]
mod common;

use common::spawn_server;
use serde_json::json;

#[tokio::test]
async fn login_requires_activation() {
    let server = spawn_server(false).await;
    let (status, registration) = server
        .post(
            "/auth/register",
            json!({ "username": "alice", "email": "alice@example.com", "password": "secret1" }),
            None,
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(registration["user"]["is_active"], false);

    let (status, body) = server
        .post(
            "/auth/login",
            json!({ "username": "alice", "password": "secret1" }),
            None,
        )
        .await;
    assert_eq!(status, 403);
    assert!(body["error"].is_string());

    let token = registration["activation_token"].as_str().unwrap();
    let (status, user) = server
        .post("/auth/activate", json!({ "token": token }), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(user["is_active"], true);

    let (status, _) = server
        .post("/auth/activate", json!({ "token": token }), None)
        .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn registration_is_validated_and_unique() {
    let server = spawn_server(false).await;
    let (status, _) = server
        .post(
            "/auth/register",
            json!({ "username": "al", "email": "al@example.com", "password": "secret1" }),
            None,
        )
        .await;
    assert_eq!(status, 400);

    let (status, _) = server
        .post(
            "/auth/register",
            json!({ "username": "alice", "email": "alice@example.com", "password": "123" }),
            None,
        )
        .await;
    assert_eq!(status, 400);

    server.signed_in_user("alice").await;
    let (status, _) = server
        .post(
            "/auth/register",
            json!({ "username": "alice", "email": "other@example.com", "password": "secret1" }),
            None,
        )
        .await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn logout_revokes_the_access_token() {
    let server = spawn_server(false).await;
    let (user_id, token) = server.signed_in_user("alice").await;

    let (status, _) = server.get(&format!("/users/{user_id}"), Some(&token)).await;
    assert_eq!(status, 200);

    let (status, _) = server.post("/auth/logout", json!({}), Some(&token)).await;
    assert_eq!(status, 200);

    let (status, _) = server.get(&format!("/users/{user_id}"), Some(&token)).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn refresh_issues_a_new_pair_once() {
    let server = spawn_server(false).await;
    server.signed_in_user("alice").await;
    let (_, tokens) = server
        .post(
            "/auth/login",
            json!({ "username": "alice", "password": "secret1" }),
            None,
        )
        .await;
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let (status, renewed) = server
        .post("/auth/refresh", json!({ "refresh_token": refresh }), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(renewed["token_type"], "bearer");

    let (status, _) = server
        .post("/auth/refresh", json!({ "refresh_token": refresh }), None)
        .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn password_reset_request_does_not_reveal_accounts() {
    let server = spawn_server(false).await;
    server.signed_in_user("alice").await;

    let (known_status, known) = server
        .post(
            "/auth/request-password-reset",
            json!({ "email": "alice@example.com" }),
            None,
        )
        .await;
    let (unknown_status, unknown) = server
        .post(
            "/auth/request-password-reset",
            json!({ "email": "nobody@example.com" }),
            None,
        )
        .await;
    assert_eq!(known_status, 200);
    assert_eq!(unknown_status, 200);
    assert_eq!(known, unknown);
}

#[tokio::test]
async fn identity_routes_require_a_token() {
    let server = spawn_server(false).await;
    let (status, body) = server.get("/users", None).await;
    assert_eq!(status, 401);
    assert!(body["error"].as_str().unwrap().contains("bearer"));

    let (status, _) = server.get("/organizations", Some("not-a-jwt")).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn only_admins_delete_users() {
    let server = spawn_server(false).await;
    let (admin_id, admin) = server.signed_in_user("alice").await;
    let (bob_id, bob) = server.signed_in_user("bob").await;

    let (status, _) = server.delete(&format!("/users/{admin_id}"), Some(&bob)).await;
    assert_eq!(status, 403);

    let (status, permissions) = server
        .get(&format!("/users/{admin_id}/permissions"), Some(&admin))
        .await;
    assert_eq!(status, 200);
    assert_eq!(permissions["roles"], json!(["admin"]));

    let (status, _) = server.delete(&format!("/users/{bob_id}"), Some(&admin)).await;
    assert_eq!(status, 200);
    let (status, _) = server.get(&format!("/users/{bob_id}"), Some(&admin)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn roles_grant_permissions() {
    let server = spawn_server(false).await;
    let (_, admin) = server.signed_in_user("alice").await;
    let (bob_id, bob) = server.signed_in_user("bob").await;

    let (status, _) = server
        .post("/roles", json!({ "name": "editor" }), Some(&bob))
        .await;
    assert_eq!(status, 403);

    let (status, role) = server
        .post("/roles", json!({ "name": "editor" }), Some(&admin))
        .await;
    assert_eq!(status, 201);
    let (status, permission) = server
        .post(
            "/permissions",
            json!({ "name": "agents:write", "description": "Manage agents" }),
            Some(&admin),
        )
        .await;
    assert_eq!(status, 201);

    let role_id = role["id"].as_i64().unwrap();
    let (status, _) = server
        .post(
            &format!("/roles/{role_id}/permissions"),
            json!({ "permission_id": permission["id"] }),
            Some(&admin),
        )
        .await;
    assert_eq!(status, 200);
    let (status, _) = server
        .post(
            &format!("/users/{bob_id}/roles"),
            json!({ "role_id": role_id }),
            Some(&admin),
        )
        .await;
    assert_eq!(status, 200);

    let (_, granted) = server
        .get(&format!("/users/{bob_id}/permissions"), Some(&bob))
        .await;
    assert_eq!(granted["permissions"], json!(["agents:write"]));

    let (status, _) = server
        .delete(&format!("/users/{bob_id}/roles/{role_id}"), Some(&admin))
        .await;
    assert_eq!(status, 200);
    let (_, granted) = server
        .get(&format!("/users/{bob_id}/permissions"), Some(&bob))
        .await;
    assert_eq!(granted["permissions"], json!([]));
}

#[tokio::test]
async fn organization_membership_and_ownership() {
    let server = spawn_server(false).await;
    let (_, _admin) = server.signed_in_user("alice").await;
    let (bob_id, bob) = server.signed_in_user("bob").await;
    let (carol_id, carol) = server.signed_in_user("carol").await;

    let (status, org) = server
        .post("/organizations", json!({ "name": "Acme" }), Some(&bob))
        .await;
    assert_eq!(status, 201);
    assert_eq!(org["owner_id"], bob_id);
    let org_id = org["id"].as_i64().unwrap();

    let (status, _) = server
        .get(&format!("/organizations/{org_id}"), Some(&carol))
        .await;
    assert_eq!(status, 403);

    let (status, _) = server
        .post(
            &format!("/organizations/{org_id}/members"),
            json!({ "user_id": carol_id }),
            Some(&bob),
        )
        .await;
    assert_eq!(status, 200);
    let (_, orgs) = server.get("/organizations", Some(&carol)).await;
    assert_eq!(orgs.as_array().unwrap().len(), 1);

    let (status, _) = server
        .put(
            &format!("/organizations/{org_id}"),
            json!({ "description": "carol was here" }),
            Some(&carol),
        )
        .await;
    assert_eq!(status, 403);

    let (status, _) = server
        .delete(
            &format!("/organizations/{org_id}/members/{bob_id}"),
            Some(&bob),
        )
        .await;
    assert_eq!(status, 400);

    let (status, transferred) = server
        .send(
            reqwest::Method::PATCH,
            &format!("/organizations/{org_id}/transfer-ownership"),
            Some(json!({ "new_owner_id": carol_id })),
            Some(&bob),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(transferred["owner_id"], carol_id);

    let (status, _) = server
        .delete(
            &format!("/organizations/{org_id}/members/{bob_id}"),
            Some(&carol),
        )
        .await;
    assert_eq!(status, 200);
}
