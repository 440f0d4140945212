//! OpenAI-compatible client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::constants::{
    OPENAI_API_PATH, OPENAI_DEFAULT_MODEL, OPENAI_DEFAULT_TEMPERATURE, OPENAI_ENDPOINT,
};
use crate::domain::LlmParams;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::LlmClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};

/// OpenAI-compatible client (OpenAI, Azure proxies, Groq, vLLM, ...)
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
    frequency_penalty: Option<f32>,
    presence_penalty: Option<f32>,
}

impl OpenAIClient {
    pub fn from_params(http: Client, api_key: String, params: &LlmParams) -> Self {
        let endpoint = params
            .endpoint
            .clone()
            .unwrap_or_else(|| OPENAI_ENDPOINT.to_string());
        Self {
            base: HttpClientBase::new(http, "openai", endpoint, api_key),
            model: params
                .model_name
                .clone()
                .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
            temperature: params.temperature.unwrap_or(OPENAI_DEFAULT_TEMPERATURE),
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    fn provider(&self) -> &str {
        &self.base.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(OPENAI_API_PATH);

        let payload = OpenAIRequest {
            model: self.model.clone(),
            messages: MessageAdapter::to_openai_format(&request.messages),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            stream: false,
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            messages = request.messages.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAIResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!("Received response from OpenAI-compatible provider");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing content"))?;

        Ok(ModelResponse::new(content))
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<serde_json::Value>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}
