//! Hosted inference hub client (text generation endpoints)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::constants::HUGGINGFACE_ENDPOINT;
use crate::domain::LlmParams;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::LlmClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};

#[derive(Clone)]
pub struct HuggingFaceClient {
    base: HttpClientBase,
    repo_id: String,
    temperature: Option<f32>,
    max_new_tokens: Option<u32>,
    top_p: Option<f32>,
}

impl HuggingFaceClient {
    /// The repository comes from `repo_id`, falling back to `model_name`.
    pub fn from_params(
        http: Client,
        api_key: String,
        params: &LlmParams,
    ) -> Result<Self, ModelError> {
        let repo_id = params
            .repo_id
            .as_deref()
            .or(params.model_name.as_deref())
            .map(str::trim)
            .filter(|repo| !repo.is_empty())
            .ok_or_else(|| ModelError::missing_parameter("huggingface", "repo_id"))?
            .to_string();
        let endpoint = params
            .endpoint
            .clone()
            .unwrap_or_else(|| HUGGINGFACE_ENDPOINT.to_string());
        Ok(Self {
            base: HttpClientBase::new(http, "huggingface", endpoint, api_key),
            repo_id,
            temperature: params.temperature,
            max_new_tokens: params.max_tokens,
            top_p: params.top_p,
        })
    }
}

#[async_trait]
impl LlmClient for HuggingFaceClient {
    fn provider(&self) -> &str {
        &self.base.id
    }

    fn model(&self) -> &str {
        &self.repo_id
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&format!("models/{}", self.repo_id));

        let payload = HubRequest {
            inputs: MessageAdapter::to_plain_prompt(&request.messages),
            parameters: HubParameters {
                temperature: self.temperature,
                max_new_tokens: self.max_new_tokens,
                top_p: self.top_p,
                return_full_text: false,
            },
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.repo_id.as_str(),
            "Sending request to hosted inference hub"
        );

        let response: Vec<HubGeneration> = self.base.post_with_bearer(&url, &payload).await?;
        debug!("Received response from hosted inference hub");

        response
            .into_iter()
            .next()
            .map(|generation| ModelResponse::new(generation.generated_text.trim().to_string()))
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "empty generation list"))
    }
}

#[derive(Serialize)]
struct HubRequest {
    inputs: String,
    parameters: HubParameters,
}

#[derive(Serialize)]
struct HubParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct HubGeneration {
    generated_text: String,
}
