use super::*;
use crate::application::ServiceError;
use crate::config::AgentSettings;
use crate::domain::{AgentConfigInput, AgentUpdate, LlmParams, ToolConfigInput, ToolInvocation};
use crate::model::{ClientFactory, LlmClient, ModelError, ModelRequest, ModelResponse, ProviderKind};
use crate::server::ApiError;
use crate::store::Store;
use crate::tooling::ToolInvocationError;
use crate::types::{ChatMessage, MessageRole};
use async_trait::async_trait;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Clone)]
struct ScriptedClient {
    responses: Arc<Mutex<Vec<String>>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedClient {
    fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    fn provider(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.recordings.lock().await.push(request);
        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            return Err(ModelError::invalid_response("scripted", "script exhausted"));
        }
        Ok(ModelResponse::new(responses.remove(0)))
    }
}

/// Hands out the scripted client for OpenAI-compatible tags and behaves like
/// the real factory for everything else.
struct ScriptedFactory {
    client: ScriptedClient,
    created: AtomicUsize,
}

impl ScriptedFactory {
    fn new(client: ScriptedClient) -> Arc<Self> {
        Arc::new(Self {
            client,
            created: AtomicUsize::new(0),
        })
    }
}

impl ClientFactory for ScriptedFactory {
    fn create(
        &self,
        provider_tag: &str,
        params: &LlmParams,
    ) -> Result<Arc<dyn LlmClient>, ModelError> {
        let kind = ProviderKind::from_tag(provider_tag)?;
        crate::model::factory::require_credential(kind, params)?;
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.client.clone()))
    }
}

async fn service_with(client: ScriptedClient) -> (AgentService, Arc<ScriptedFactory>) {
    let factory = ScriptedFactory::new(client);
    let store = Store::in_memory().await.unwrap();
    let service = AgentService::new(
        store,
        factory.clone(),
        reqwest::Client::new(),
        AgentSettings::default(),
    );
    (service, factory)
}

fn bot(llm_type: &str) -> AgentConfigInput {
    AgentConfigInput {
        name: "Bot".to_string(),
        llm_type: llm_type.to_string(),
        llm_config: LlmParams {
            api_key: Some("k".to_string()),
            ..LlmParams::default()
        },
        prompt_template: "You are helpful.".to_string(),
        ..AgentConfigInput::default()
    }
}

fn tool_input(name: &str, url: String, is_active: bool) -> ToolConfigInput {
    ToolConfigInput {
        name: name.to_string(),
        description: format!("{name} lookup"),
        config: ToolInvocation {
            url,
            input_key: "q".to_string(),
            ..ToolInvocation::default()
        },
        is_active,
        api_key: None,
        webhook_url: None,
    }
}

/// Local endpoint standing in for a tool target; records the `q` parameter.
async fn spawn_weather_endpoint() -> (String, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let app = axum::Router::new().route(
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
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/weather"), seen)
}

#[tokio::test]
async fn plain_agent_sends_prompt_and_input_only() {
    let client = ScriptedClient::new(vec!["Hello!"]);
    let (service, _) = service_with(client.clone()).await;
    service.create(bot("openai-compatible")).await.unwrap();

    let reply = service.resolve_and_invoke("Bot", "hi").await.unwrap();

    assert_eq!(reply.response, "Hello!");
    let requests = client.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].messages,
        vec![
            ChatMessage::system("You are helpful."),
            ChatMessage::user("hi"),
        ]
    );
    assert!(!service.resolve("Bot").await.unwrap().is_degraded());
}

#[tokio::test]
async fn unknown_provider_degrades_to_fallback_message() {
    let client = ScriptedClient::new(vec![]);
    let (service, factory) = service_with(client.clone()).await;
    let mut input = bot("unknown-llm");
    input.fallback_prompt = Some("We are offline.".to_string());
    service.create(input).await.unwrap();

    let assembly = service.resolve("Bot").await.unwrap();
    assert!(assembly.is_degraded());

    let reply = service.resolve_and_invoke("Bot", "hi").await.unwrap();
    assert_eq!(reply.response, "We are offline.");
    assert!(client.requests().await.is_empty());
    assert_eq!(factory.created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn broken_template_degrades_to_default_fallback() {
    let (service, _) = service_with(ScriptedClient::new(vec![])).await;
    let mut input = bot("openai");
    input.prompt_template = "Hello {{customer}}".to_string();
    service.create(input).await.unwrap();

    let reply = service.resolve_and_invoke("Bot", "hi").await.unwrap();
    assert_eq!(reply.response, "Sorry, something went wrong.");
}

#[tokio::test]
async fn missing_field_is_rejected_without_persisting() {
    let (service, _) = service_with(ScriptedClient::new(vec![])).await;
    let mut input = bot("openai");
    input.prompt_template.clear();

    let err = service.create(input).await.unwrap_err();

    assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "prompt_template"));
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_name_conflicts_and_keeps_existing_row() {
    let (service, _) = service_with(ScriptedClient::new(vec![])).await;
    service.create(bot("openai")).await.unwrap();

    let mut second = bot("cohere");
    second.prompt_template = "Different".to_string();
    let err = service.create(second).await.unwrap_err();

    assert!(matches!(err, ServiceError::Conflict { entity: "agent", .. }));
    let stored = service.get("Bot").await.unwrap();
    assert_eq!(stored.llm_type, "openai");
    assert_eq!(stored.prompt_template, "You are helpful.");
}

#[tokio::test]
async fn unknown_agent_is_not_found() {
    let (service, _) = service_with(ScriptedClient::new(vec![])).await;
    let err = service.resolve_and_invoke("Ghost", "hi").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "agent", .. }));
}

#[tokio::test]
async fn repeated_invocations_send_identical_requests() {
    let client = ScriptedClient::new(vec!["one", "two"]);
    let (service, _) = service_with(client.clone()).await;
    service.create(bot("openai")).await.unwrap();

    service.resolve_and_invoke("Bot", "hi").await.unwrap();
    service.resolve_and_invoke("Bot", "hi").await.unwrap();

    let requests = client.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn tool_loop_calls_the_endpoint_and_feeds_back_the_result() {
    let (url, seen) = spawn_weather_endpoint().await;
    let client = ScriptedClient::new(vec![
        r#"{"action":"call_tool","tool":"weather","input":"paris"}"#,
        r#"{"action":"final","response":"It is sunny in Paris."}"#,
    ]);
    let (service, _) = service_with(client.clone()).await;
    let mut input = bot("openai");
    input.tools = vec![tool_input("weather", url, true)];
    service.create(input).await.unwrap();

    let reply = service.resolve_and_invoke("Bot", "weather in paris?").await.unwrap();

    assert_eq!(reply.response, "It is sunny in Paris.");
    assert_eq!(seen.lock().await.clone(), vec!["paris"]);

    let requests = client.requests().await;
    assert_eq!(requests.len(), 2);
    let observation = requests[1].messages.last().unwrap();
    assert_eq!(observation.role, MessageRole::User);
    assert!(observation.content.contains("sunny in paris"));
}

#[tokio::test]
async fn inactive_tools_are_not_offered_to_the_model() {
    let client = ScriptedClient::new(vec![r#"{"action":"final","response":"ok"}"#]);
    let (service, _) = service_with(client.clone()).await;
    let mut input = bot("openai");
    input.tools = vec![
        tool_input("weather", "https://x/weather".to_string(), true),
        tool_input("news", "https://x/news".to_string(), false),
    ];
    service.create(input).await.unwrap();

    assert_eq!(service.tools("Bot").await.unwrap().len(), 2);
    service.resolve_and_invoke("Bot", "hi").await.unwrap();

    let requests = client.requests().await;
    let system = requests[0].system_prompt().unwrap();
    assert!(system.contains("- weather: weather lookup"));
    assert!(!system.contains("news"));
}

#[tokio::test]
async fn unknown_tool_request_is_an_invocation_error() {
    let client = ScriptedClient::new(vec![r#"{"action":"call_tool","tool":"stocks","input":"x"}"#]);
    let (service, _) = service_with(client).await;
    let mut input = bot("openai");
    input.tools = vec![tool_input("weather", "https://x/weather".to_string(), true)];
    service.create(input).await.unwrap();

    let err = service.resolve_and_invoke("Bot", "hi").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Invocation(AgentError::UnknownTool(ref name)) if name == "stocks"
    ));
}

#[tokio::test]
async fn update_is_validated_and_name_is_kept() {
    let (service, _) = service_with(ScriptedClient::new(vec![])).await;
    service.create(bot("openai")).await.unwrap();

    let updated = service
        .update(
            "Bot",
            AgentUpdate {
                description: Some("Weather helper".to_string()),
                ..AgentUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Bot");
    assert_eq!(updated.description, "Weather helper");

    let err = service
        .update(
            "Bot",
            AgentUpdate {
                prompt_template: Some(String::new()),
                ..AgentUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.get("Bot").await.unwrap().prompt_template, "You are helpful.");
}

#[tokio::test]
async fn registry_reuses_the_assembled_agent() {
    let client = ScriptedClient::new(vec!["first", "second"]);
    let (service, factory) = service_with(client).await;
    service.create(bot("openai")).await.unwrap();
    let mut registry = AgentRegistry::new();

    let first = service.invoke_in(&mut registry, "Bot", "a").await.unwrap();
    let second = service.invoke_in(&mut registry, "Bot", "b").await.unwrap();

    assert_eq!(first.response, "first");
    assert_eq!(second.response, "second");
    assert_eq!(registry.len(), 1);
    assert_eq!(factory.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn step_budget_bounds_the_tool_loop() {
    let (url, seen) = spawn_weather_endpoint().await;
    let call = r#"{"action":"call_tool","tool":"weather","input":"oslo"}"#;
    let client = ScriptedClient::new(vec![call; 10]);
    let factory = ScriptedFactory::new(client);
    let service = AgentService::new(
        Store::in_memory().await.unwrap(),
        factory,
        reqwest::Client::new(),
        AgentSettings {
            max_tool_steps: 2,
            ..AgentSettings::default()
        },
    );
    let mut input = bot("openai");
    input.tools = vec![tool_input("weather", url, true)];
    service.create(input).await.unwrap();

    let err = service.resolve_and_invoke("Bot", "loop").await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Invocation(AgentError::StepLimit { max: 2 })
    ));
    assert_eq!(seen.lock().await.len(), 2);
}

async fn spawn_failing_endpoint() -> String {
    let app = axum::Router::new().route(
        "/weather",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/weather")
}

async fn weather_bot_at(url: String) -> AgentService {
    let client = ScriptedClient::new(vec![r#"{"action":"call_tool","tool":"weather","input":"paris"}"#]);
    let (service, _) = service_with(client).await;
    let mut input = bot("openai");
    input.tools = vec![tool_input("weather", url, true)];
    service.create(input).await.unwrap();
    service
}

#[tokio::test]
async fn tool_error_status_surfaces_at_call_time() {
    let service = weather_bot_at(spawn_failing_endpoint().await).await;
    assert!(!service.resolve("Bot").await.unwrap().is_degraded());

    let err = service.resolve_and_invoke("Bot", "hi").await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Invocation(AgentError::Tool(ToolInvocationError::Status { status: 500, .. }))
    ));
    let api = ApiError::from(err);
    assert_eq!(api.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(api.message(), "The agent failed to produce a response.");
}

#[tokio::test]
async fn unreachable_tool_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/weather", listener.local_addr().unwrap());
    drop(listener);
    let service = weather_bot_at(url).await;
    assert!(!service.resolve("Bot").await.unwrap().is_degraded());

    let err = service.resolve_and_invoke("Bot", "hi").await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Invocation(AgentError::Tool(ToolInvocationError::Transport { .. }))
    ));
    assert_eq!(ApiError::from(err).status(), StatusCode::BAD_GATEWAY);
}
