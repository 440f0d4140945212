//! Provider factory - creates clients from stored agent parameters

use super::clients::{CohereClient, HuggingFaceClient, OpenAIClient};
use super::traits::{ClientFactory, LlmClient};
use super::types::ModelError;
use crate::domain::LlmParams;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Closed set of provider families an agent may be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAiCompatible,
    CohereCompatible,
    HostedInferenceHub,
}

impl ProviderKind {
    /// Parse a stored `llm_type` tag (case-insensitive).
    ///
    /// | Tag | Kind |
    /// |-----|------|
    /// | `openai`, `openai-compatible` | OpenAI chat completions |
    /// | `cohere`, `cohere-compatible` | Cohere chat |
    /// | `huggingface`, `hosted-inference-hub` | Hosted text generation |
    pub fn from_tag(tag: &str) -> Result<Self, ModelError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "openai" | "openai-compatible" => Ok(Self::OpenAiCompatible),
            "cohere" | "cohere-compatible" => Ok(Self::CohereCompatible),
            "huggingface" | "hugging-face" | "hosted-inference-hub" => {
                Ok(Self::HostedInferenceHub)
            }
            _ => Err(ModelError::unsupported_provider(tag)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAiCompatible => "openai",
            Self::CohereCompatible => "cohere",
            Self::HostedInferenceHub => "huggingface",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the credential a provider needs, failing when it is blank.
pub fn require_credential(kind: ProviderKind, params: &LlmParams) -> Result<String, ModelError> {
    params
        .credential()
        .map(str::to_string)
        .ok_or_else(|| ModelError::missing_credential(kind.as_str()))
}

/// Factory producing HTTP-backed clients that share one connection pool.
#[derive(Clone, Default)]
pub struct HttpClientFactory {
    http: Client,
}

impl HttpClientFactory {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

impl ClientFactory for HttpClientFactory {
    fn create(
        &self,
        provider_tag: &str,
        params: &LlmParams,
    ) -> Result<Arc<dyn LlmClient>, ModelError> {
        let kind = ProviderKind::from_tag(provider_tag).inspect_err(|err| {
            error!(tag = provider_tag, %err, "Unsupported LLM type");
        })?;
        let api_key = require_credential(kind, params)?;
        debug!(provider = kind.as_str(), model = ?params.model_name, "Creating LLM client");

        let client: Arc<dyn LlmClient> = match kind {
            ProviderKind::OpenAiCompatible => {
                Arc::new(OpenAIClient::from_params(self.http.clone(), api_key, params))
            }
            ProviderKind::CohereCompatible => {
                Arc::new(CohereClient::from_params(self.http.clone(), api_key, params))
            }
            ProviderKind::HostedInferenceHub => Arc::new(HuggingFaceClient::from_params(
                self.http.clone(),
                api_key,
                params,
            )?),
        };
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_with_key() -> LlmParams {
        LlmParams {
            api_key: Some("k".into()),
            ..Default::default()
        }
    }

    #[test]
    fn tags_are_case_insensitive_with_aliases() {
        assert_eq!(
            ProviderKind::from_tag("OpenAI").unwrap(),
            ProviderKind::OpenAiCompatible
        );
        assert_eq!(
            ProviderKind::from_tag("openai-compatible").unwrap(),
            ProviderKind::OpenAiCompatible
        );
        assert_eq!(
            ProviderKind::from_tag("cohere-compatible").unwrap(),
            ProviderKind::CohereCompatible
        );
        assert_eq!(
            ProviderKind::from_tag("hosted-inference-hub").unwrap(),
            ProviderKind::HostedInferenceHub
        );
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let factory = HttpClientFactory::default();
        let result = factory.create("unknown-llm", &params_with_key());
        assert!(matches!(
            result,
            Err(ModelError::UnsupportedProvider { ref tag }) if tag == "unknown-llm"
        ));
    }

    #[test]
    fn blank_key_is_missing_credential() {
        let factory = HttpClientFactory::default();
        let params = LlmParams {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        let result = factory.create("cohere", &params);
        assert!(matches!(result, Err(ModelError::MissingCredential { .. })));
    }

    #[test]
    fn openai_defaults_to_gpt_4o() {
        let factory = HttpClientFactory::default();
        let client = factory.create("openai", &params_with_key()).expect("client");
        assert_eq!(client.provider(), "openai");
        assert_eq!(client.model(), "gpt-4o");
    }

    #[test]
    fn hub_requires_a_repository() {
        let factory = HttpClientFactory::default();
        let result = factory.create("huggingface", &params_with_key());
        assert!(matches!(
            result,
            Err(ModelError::MissingParameter {
                field: "repo_id",
                ..
            })
        ));

        let params = LlmParams {
            repo_id: Some("google/flan-t5-xl".into()),
            ..params_with_key()
        };
        let client = factory.create("huggingface", &params).expect("client");
        assert_eq!(client.model(), "google/flan-t5-xl");
    }
}
