//! # Agent Configuration
//!
//! Stored description of an agent: which provider to talk to, with which
//! parameters, under which system prompt, and what to answer when the agent
//! cannot be built.
//!
//! ```json
//! {
//!   "name": "Bot",
//!   "description": "General helper",
//!   "llm_type": "openai",
//!   "llm_config": { "model_name": "gpt-4o", "api_key": "sk-...", "temperature": 0.2 },
//!   "prompt_template": "You are helpful.",
//!   "fallback_prompt": "Sorry, something went wrong."
//! }
//! ```

use super::tool::ToolConfigInput;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider-specific parameters. Every field is optional at the type level;
/// which ones are mandatory depends on the provider and is enforced by the
/// validator and the client factory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct LlmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    /// Repository id for hosted inference hubs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<String>,
    /// Base URL override for self-hosted or proxied providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl LlmParams {
    /// Credential with surrounding whitespace removed; blank counts as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Copy safe to hand back to API callers.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

/// A persisted agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub llm_type: String,
    pub llm_config: LlmParams,
    pub prompt_template: String,
    pub fallback_prompt: String,
}

impl AgentConfig {
    pub fn redacted(&self) -> Self {
        Self {
            llm_config: self.llm_config.redacted(),
            ..self.clone()
        }
    }
}

/// Payload accepted by agent creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AgentConfigInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub llm_type: String,
    #[serde(default)]
    pub llm_config: LlmParams,
    #[serde(default)]
    pub prompt_template: String,
    #[serde(default)]
    pub fallback_prompt: Option<String>,
    /// Tools created together with the agent and associated to it.
    #[serde(default)]
    pub tools: Vec<ToolConfigInput>,
}

/// Fields an agent update may overwrite. The name is the agent's identity
/// and cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AgentUpdate {
    pub description: Option<String>,
    pub llm_type: Option<String>,
    pub llm_config: Option<LlmParams>,
    pub prompt_template: Option<String>,
    pub fallback_prompt: Option<String>,
}

impl AgentUpdate {
    pub fn apply(self, agent: &mut AgentConfig) {
        if let Some(description) = self.description {
            agent.description = description;
        }
        if let Some(llm_type) = self.llm_type {
            agent.llm_type = llm_type;
        }
        if let Some(llm_config) = self.llm_config {
            agent.llm_config = llm_config;
        }
        if let Some(prompt_template) = self.prompt_template {
            agent.prompt_template = prompt_template;
        }
        if let Some(fallback_prompt) = self.fallback_prompt {
            agent.fallback_prompt = fallback_prompt;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.llm_type.is_none()
            && self.llm_config.is_none()
            && self.prompt_template.is_none()
            && self.fallback_prompt.is_none()
    }
}
