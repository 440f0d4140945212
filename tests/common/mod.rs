// Shared harness: an in-memory server on 127.0.0.1:0 and a small JSON client.

#![allow(dead_code)]

use glymph_core::config::AppConfig;
use glymph_core::server::{self, ServerState};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const SECRET: &str = "integration-secret";

pub struct TestServer {
    pub base: String,
    pub http: reqwest::Client,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server(protect_resources: bool) -> TestServer {
    let mut config = AppConfig::ephemeral(SECRET);
    config.auth = config.auth.with_protect_resources(protect_resources);
    let state = Arc::new(ServerState::from_config(&config).await.expect("state"));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let _ = server::serve_with_listener(state, listener).await;
    });

    TestServer {
        base: format!("http://{addr}"),
        http: reqwest::Client::new(),
        handle,
    }
}

impl TestServer {
    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (u16, Value) {
        let mut request = self.http.request(method, format!("{}{path}", self.base));
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.expect("request");
        let status = response.status().as_u16();
        let text = response.text().await.expect("body");
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        self.send(reqwest::Method::GET, path, None, token).await
    }

    pub async fn post(&self, path: &str, body: Value, token: Option<&str>) -> (u16, Value) {
        self.send(reqwest::Method::POST, path, Some(body), token).await
    }

    pub async fn put(&self, path: &str, body: Value, token: Option<&str>) -> (u16, Value) {
        self.send(reqwest::Method::PUT, path, Some(body), token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        self.send(reqwest::Method::DELETE, path, None, token).await
    }

    /// Register, activate and log in; returns (user id, access token).
    pub async fn signed_in_user(&self, username: &str) -> (i64, String) {
        let (status, registration) = self
            .post(
                "/auth/register",
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "secret1"
                }),
                None,
            )
            .await;
        assert_eq!(status, 201, "register: {registration}");
        let user_id = registration["user"]["id"].as_i64().expect("user id");
        let activation = registration["activation_token"]
            .as_str()
            .expect("activation token");

        let (status, _) = self
            .post("/auth/activate", json!({ "token": activation }), None)
            .await;
        assert_eq!(status, 200);

        let (status, tokens) = self
            .post(
                "/auth/login",
                json!({ "username": username, "password": "secret1" }),
                None,
            )
            .await;
        assert_eq!(status, 200, "login: {tokens}");
        let access = tokens["access_token"].as_str().expect("access token");
        (user_id, access.to_string())
    }
}

pub fn agent_body(name: &str, llm_type: &str) -> Value {
    json!({
        "name": name,
        "description": "test agent",
        "llm_type": llm_type,
        "llm_config": { "model_name": "gpt-4o", "api_key": "sk-test" },
        "prompt_template": "You are helpful.",
        "fallback_prompt": "Sorry, something went wrong."
    })
}
