//! Cohere-compatible chat client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::constants::{COHERE_API_PATH, COHERE_DEFAULT_MODEL, COHERE_ENDPOINT};
use crate::domain::LlmParams;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::LlmClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};

#[derive(Clone)]
pub struct CohereClient {
    base: HttpClientBase,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
}

impl CohereClient {
    pub fn from_params(http: Client, api_key: String, params: &LlmParams) -> Self {
        let endpoint = params
            .endpoint
            .clone()
            .unwrap_or_else(|| COHERE_ENDPOINT.to_string());
        Self {
            base: HttpClientBase::new(http, "cohere", endpoint, api_key),
            model: params
                .model_name
                .clone()
                .unwrap_or_else(|| COHERE_DEFAULT_MODEL.to_string()),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
        }
    }
}

#[async_trait]
impl LlmClient for CohereClient {
    fn provider(&self) -> &str {
        &self.base.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(COHERE_API_PATH);
        let conversation = MessageAdapter::to_cohere_format(&request.messages);

        let payload = CohereRequest {
            model: self.model.clone(),
            message: conversation.message,
            preamble: conversation.preamble,
            chat_history: conversation.history,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            p: self.top_p,
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            history = payload.chat_history.len(),
            "Sending request to Cohere-compatible provider"
        );

        let response: CohereResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!("Received response from Cohere-compatible provider");

        response
            .text
            .map(ModelResponse::new)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing text"))
    }
}

#[derive(Serialize)]
struct CohereRequest {
    model: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    preamble: Option<String>,
    chat_history: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p: Option<f32>,
}

#[derive(Deserialize)]
struct CohereResponse {
    text: Option<String>,
}
