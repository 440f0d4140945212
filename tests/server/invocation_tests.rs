// End-to-end invocation: the agent's provider endpoint and its tool target
// are both local axum servers.

#[path = "../common/mod.rs"]
mod common;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::spawn_server;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Replies with the scripted contents in order and records every request body.
#[derive(Clone, Default)]
struct FakeProvider {
    script: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn chat_completions(
    State(provider): State<FakeProvider>,
    Json(body): Json<Value>,
) -> Json<Value> {
    provider.requests.lock().await.push(body);
    let mut script = provider.script.lock().await;
    let content = if script.is_empty() {
        "out of script".to_string()
    } else {
        script.remove(0)
    };
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

async fn spawn_provider(script: Vec<String>) -> (String, FakeProvider) {
    let provider = FakeProvider {
        script: Arc::new(Mutex::new(script)),
        ..FakeProvider::default()
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(provider.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), provider)
}

async fn spawn_weather() -> (String, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/weather",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                let city = params.get("q").cloned().unwrap_or_default();
                recorder.lock().await.push(city.clone());
                format!("sunny in {city}")
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/weather"), seen)
}

fn agent_with_endpoint(endpoint: &str, tools: Value) -> Value {
    json!({
        "name": "Forecaster",
        "description": "Answers weather questions",
        "llm_type": "openai",
        "llm_config": { "model_name": "gpt-4o", "api_key": "sk-test", "endpoint": endpoint },
        "prompt_template": "You are helpful.",
        "tools": tools
    })
}

#[tokio::test]
async fn plain_agent_returns_the_provider_text() {
    let server = spawn_server(false).await;
    let (endpoint, provider) = spawn_provider(vec!["Hello there".to_string()]).await;
    server
        .post("/agents/create", agent_with_endpoint(&endpoint, json!([])), None)
        .await;

    let (status, reply) = server
        .post(
            "/agents/use",
            json!({ "name": "Forecaster", "input_text": "hi" }),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(reply["response"], "Hello there");

    let requests = provider.requests.lock().await;
    assert_eq!(requests.len(), 1);
    let messages = requests[0]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "hi");
}

#[tokio::test]
async fn agent_calls_its_tool_and_answers() {
    let server = spawn_server(false).await;
    let (weather_url, seen) = spawn_weather().await;
    let (endpoint, provider) = spawn_provider(vec![
        json!({ "action": "call_tool", "tool": "weather", "input": "paris" }).to_string(),
        json!({ "action": "final", "response": "It is sunny in Paris." }).to_string(),
    ])
    .await;

    let tools = json!([{
        "name": "weather",
        "description": "Current weather for a city",
        "config": { "url": weather_url, "input_location": "params", "input_key": "q" }
    }]);
    let (status, _) = server
        .post("/agents/create", agent_with_endpoint(&endpoint, tools), None)
        .await;
    assert_eq!(status, 201);

    let (status, reply) = server
        .post(
            "/agents/use",
            json!({ "name": "Forecaster", "input_text": "Weather in Paris?" }),
            None,
        )
        .await;
    assert_eq!(status, 200, "{reply}");
    assert_eq!(reply["response"], "It is sunny in Paris.");
    assert_eq!(*seen.lock().await, vec!["paris".to_string()]);

    let requests = provider.requests.lock().await;
    assert_eq!(requests.len(), 2);
    let follow_up = requests[1]["messages"].to_string();
    assert!(follow_up.contains("sunny in paris"));
}

#[tokio::test]
async fn unreachable_provider_is_a_bad_gateway() {
    let server = spawn_server(false).await;
    // Bind then drop so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    server
        .post("/agents/create", agent_with_endpoint(&endpoint, json!([])), None)
        .await;
    let (status, body) = server
        .post(
            "/agents/use",
            json!({ "name": "Forecaster", "input_text": "hi" }),
            None,
        )
        .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "The agent failed to produce a response.");
}

#[tokio::test]
async fn failing_tool_is_a_bad_gateway_without_details() {
    let server = spawn_server(false).await;
    let app = Router::new().route(
        "/weather",
        get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "weather backend down") }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let weather_url = format!("http://{}/weather", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let (endpoint, _) = spawn_provider(vec![
        json!({ "action": "call_tool", "tool": "weather", "input": "paris" }).to_string(),
    ])
    .await;
    let tools = json!([{
        "name": "weather",
        "config": { "url": weather_url, "input_location": "params", "input_key": "q" }
    }]);
    server
        .post("/agents/create", agent_with_endpoint(&endpoint, tools), None)
        .await;

    let (status, body) = server
        .post(
            "/agents/use",
            json!({ "name": "Forecaster", "input_text": "Weather in Paris?" }),
            None,
        )
        .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "The agent failed to produce a response.");
    assert!(!body.to_string().contains("weather backend down"));
}
