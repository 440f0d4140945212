// Tool and webhook endpoints

#[path = "../common/mod.rs"]
mod common;

use common::{agent_body, spawn_server};
use serde_json::{Value, json};

fn weather_tool(webhook_url: Option<&str>) -> Value {
    let mut tool = json!({
        "name": "weather",
        "description": "Current weather for a city",
        "config": {
            "url": "https://example.com/weather",
            "method": "GET",
            "input_location": "params",
            "input_key": "q"
        },
        "api_key": "tool-secret"
    });
    if let Some(url) = webhook_url {
        tool["webhook_url"] = json!(url);
    }
    tool
}

#[tokio::test]
async fn tool_lifecycle_with_inline_webhook() {
    let server = spawn_server(false).await;
    let (status, tool) = server
        .post(
            "/tools/create",
            weather_tool(Some("https://hooks.example.com/weather")),
            None,
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(tool["api_key"], "********");
    let id = tool["id"].as_str().unwrap().to_string();

    let (_, webhooks) = server.get(&format!("/tools/{id}/webhooks"), None).await;
    assert_eq!(webhooks.as_array().unwrap().len(), 1);
    assert_eq!(webhooks[0]["url"], "https://hooks.example.com/weather");

    let (status, copy) = server
        .post(&format!("/tools/duplicate/{id}"), json!({}), None)
        .await;
    assert_eq!(status, 201);
    assert_eq!(copy["name"], "weather_copy");

    let (status, deactivated) = server
        .post(&format!("/tools/deactivate/{id}"), json!({}), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(deactivated["is_active"], false);

    let (status, updated) = server
        .put(
            &format!("/tools/update/{id}"),
            json!({ "description": "Forecast" }),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["description"], "Forecast");

    let (status, _) = server.delete(&format!("/tools/delete/{id}"), None).await;
    assert_eq!(status, 200);
    let (status, _) = server.get(&format!("/tools/details/{id}"), None).await;
    assert_eq!(status, 404);
    let (_, webhooks) = server.get("/webhooks/list", None).await;
    assert!(webhooks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn tool_without_url_is_rejected() {
    let server = spawn_server(false).await;
    let mut tool = weather_tool(None);
    tool["config"]["url"] = json!("");
    let (status, body) = server.post("/tools/create", tool, None).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("config.url"));
}

#[tokio::test]
async fn only_active_tools_can_be_associated() {
    let server = spawn_server(false).await;
    server
        .post("/agents/create", agent_body("Bot", "openai"), None)
        .await;
    let (_, tool) = server.post("/tools/create", weather_tool(None), None).await;
    let id = tool["id"].as_str().unwrap().to_string();
    server
        .post(&format!("/tools/deactivate/{id}"), json!({}), None)
        .await;

    let (status, _) = server
        .post("/agents/Bot/tools", json!({ "tool_ids": [id] }), None)
        .await;
    assert_eq!(status, 404);

    server
        .post(&format!("/tools/activate/{id}"), json!({}), None)
        .await;
    let (status, association) = server
        .post("/agents/Bot/tools", json!({ "tool_ids": [id] }), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(association["changed"], 1);

    let (_, tools) = server.get("/agents/Bot/tools", None).await;
    assert_eq!(tools.as_array().unwrap().len(), 1);

    let (status, association) = server
        .send(
            reqwest::Method::DELETE,
            "/agents/Bot/tools",
            Some(json!({ "tool_ids": [id] })),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(association["changed"], 1);
}

#[tokio::test]
async fn webhook_link_conflicts_with_existing_owner() {
    let server = spawn_server(false).await;
    let (_, tool) = server
        .post(
            "/tools/create",
            weather_tool(Some("https://hooks.example.com/first")),
            None,
        )
        .await;
    let tool_id = tool["id"].as_str().unwrap().to_string();

    let (status, webhook) = server
        .post(
            "/webhooks/create",
            json!({ "url": "https://hooks.example.com/second", "api_key": "hook-key" }),
            None,
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(webhook["api_key"], "********");
    let webhook_id = webhook["id"].as_str().unwrap().to_string();

    let (status, _) = server
        .post(
            &format!("/webhooks/link/{webhook_id}/tool/{tool_id}"),
            json!({}),
            None,
        )
        .await;
    assert_eq!(status, 409);

    let (status, updated) = server
        .put(
            &format!("/webhooks/update/{webhook_id}"),
            json!({ "description": "spare" }),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["description"], "spare");

    let (status, _) = server
        .delete(&format!("/webhooks/delete/{webhook_id}"), None)
        .await;
    assert_eq!(status, 200);
    let (status, _) = server
        .get(&format!("/webhooks/details/{webhook_id}"), None)
        .await;
    assert_eq!(status, 404);
}
