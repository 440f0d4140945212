// Agent configuration endpoints and the fallback path

#[path = "../common/mod.rs"]
mod common;

use common::{agent_body, spawn_server};
use serde_json::json;

#[tokio::test]
async fn welcome_banner() {
    let server = spawn_server(false).await;
    let (status, body) = server.get("/", None).await;
    assert_eq!(status, 200);
    assert!(body["message"].as_str().unwrap().contains("Glymph"));
}

#[tokio::test]
async fn create_then_read_masks_credentials() {
    let server = spawn_server(false).await;
    let (status, created) = server
        .post("/agents/create", agent_body("Bot", "openai"), None)
        .await;
    assert_eq!(status, 201);
    assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));

    let (status, agent) = server.get("/agents/Bot", None).await;
    assert_eq!(status, 200);
    assert_eq!(agent["llm_type"], "openai");
    assert_eq!(agent["llm_config"]["api_key"], "********");

    let (_, agents) = server.get("/agents/list", None).await;
    assert_eq!(agents.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() {
    let server = spawn_server(false).await;
    server
        .post("/agents/create", agent_body("Bot", "openai"), None)
        .await;

    let mut second = agent_body("Bot", "cohere");
    second["description"] = json!("replacement");
    let (status, body) = server.post("/agents/create", second, None).await;
    assert_eq!(status, 409);
    assert!(body["error"].as_str().unwrap().contains("Bot"));

    let (_, agent) = server.get("/agents/Bot", None).await;
    assert_eq!(agent["llm_type"], "openai");
}

#[tokio::test]
async fn missing_credential_is_rejected_without_persisting() {
    let server = spawn_server(false).await;
    let mut body = agent_body("Bot", "openai");
    body["llm_config"] = json!({ "model_name": "gpt-4o" });

    let (status, error) = server.post("/agents/create", body, None).await;
    assert_eq!(status, 400);
    assert!(error["error"]
        .as_str()
        .unwrap()
        .contains("llm_config.api_key"));

    let (status, _) = server.get("/agents/Bot", None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn unsupported_provider_answers_with_the_fallback() {
    let server = spawn_server(false).await;
    let (status, _) = server
        .post("/agents/create", agent_body("Bot", "foo"), None)
        .await;
    assert_eq!(status, 201);

    let (status, reply) = server
        .post(
            "/agents/use",
            json!({ "name": "Bot", "input_text": "hello" }),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(reply["response"], "Sorry, something went wrong.");
}

#[tokio::test]
async fn unknown_agent_is_not_found() {
    let server = spawn_server(false).await;
    let (status, body) = server
        .post(
            "/agents/use",
            json!({ "name": "Ghost", "input_text": "hi" }),
            None,
        )
        .await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("Ghost"));
}

#[tokio::test]
async fn update_revalidates_and_delete_removes() {
    let server = spawn_server(false).await;
    server
        .post("/agents/create", agent_body("Bot", "openai"), None)
        .await;

    let (status, updated) = server
        .put(
            "/agents/Bot",
            json!({ "description": "updated", "llm_config": { "temperature": 0.1 } }),
            None,
        )
        .await;
    assert_eq!(status, 400, "update without a key must be rejected: {updated}");

    let (status, updated) = server
        .put("/agents/Bot", json!({ "description": "updated" }), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["description"], "updated");
    assert_eq!(updated["name"], "Bot");

    let (status, _) = server.delete("/agents/Bot", None).await;
    assert_eq!(status, 200);
    let (status, _) = server.get("/agents/Bot", None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn protected_resources_need_a_bearer_token() {
    let server = spawn_server(true).await;
    let (status, body) = server.get("/agents/list", None).await;
    assert_eq!(status, 401);
    assert!(body["error"].is_string());

    let (_, token) = server.signed_in_user("alice").await;
    let (status, _) = server.get("/agents/list", Some(&token)).await;
    assert_eq!(status, 200);
    let (status, _) = server
        .post("/agents/create", agent_body("Bot", "openai"), Some(&token))
        .await;
    assert_eq!(status, 201);
}
