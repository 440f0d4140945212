//! # Tool Configuration
//!
//! A tool is an outbound HTTP call an agent may decide to make. The caller's
//! text is injected at `input_location` under `input_key`:
//!
//! | Location  | Effect                                         |
//! |-----------|------------------------------------------------|
//! | `params`  | appended as query parameter `?{key}={input}`   |
//! | `body`    | set as field `{key}` of the JSON body          |
//! | `headers` | sent as header `{key}: {input}`                |
//! | `url`     | replaces the literal `{key}` inside the URL    |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputLocation {
    #[default]
    Params,
    Body,
    Headers,
    Url,
}

fn default_input_key() -> String {
    "input".to_string()
}

/// Parameters of the outbound call a tool performs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ToolInvocation {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Static query parameters sent with every call
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub params: BTreeMap<String, Value>,
    /// Static JSON body sent with every call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub body: Option<Value>,
    #[serde(default)]
    pub input_location: InputLocation,
    #[serde(default = "default_input_key")]
    pub input_key: String,
}

/// A persisted tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ToolConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub config: ToolInvocation,
}

impl ToolConfig {
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

fn default_active() -> bool {
    true
}

/// Payload accepted by tool creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ToolConfigInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: ToolInvocation,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Creates a webhook owned by the new tool
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Fields a tool update may overwrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ToolUpdate {
    pub description: Option<String>,
    pub config: Option<ToolInvocation>,
    pub is_active: Option<bool>,
    pub api_key: Option<String>,
    /// Rewrites the url of the tool's webhook, if it has one
    pub webhook_url: Option<String>,
}

impl ToolUpdate {
    pub fn apply(&self, tool: &mut ToolConfig) {
        if let Some(description) = &self.description {
            tool.description = description.clone();
        }
        if let Some(config) = &self.config {
            tool.config = config.clone();
        }
        if let Some(is_active) = self.is_active {
            tool.is_active = is_active;
        }
        if let Some(api_key) = &self.api_key {
            tool.api_key = Some(api_key.clone());
        }
    }
}
