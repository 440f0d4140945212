use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// External notification endpoint, owned by at most one tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct WebhookConfig {
    pub id: String,
    pub tool_id: Option<String>,
    pub url: String,
    pub api_key: String,
    pub description: String,
    pub is_active: bool,
}

impl WebhookConfig {
    pub fn redacted(&self) -> Self {
        Self {
            api_key: "********".to_string(),
            ..self.clone()
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct WebhookInput {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub tool_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct WebhookUpdate {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl WebhookUpdate {
    pub fn apply(self, webhook: &mut WebhookConfig) {
        if let Some(url) = self.url {
            webhook.url = url;
        }
        if let Some(api_key) = self.api_key {
            webhook.api_key = api_key;
        }
        if let Some(description) = self.description {
            webhook.description = description;
        }
        if let Some(is_active) = self.is_active {
            webhook.is_active = is_active;
        }
    }
}
