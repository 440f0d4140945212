//! Model types - Request, Response, and Error types

use crate::types::{ChatMessage, MessageRole};
use reqwest::StatusCode;
use thiserror::Error;

/// Conversation handed to an LLM client. Generation parameters live on the
/// client itself, fixed when it is built from an agent configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub messages: Vec<ChatMessage>,
}

impl ModelRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Content of the first system message, if any
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
    }
}

/// Model response from LLM
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
}

impl ModelResponse {
    pub fn new(content: String) -> Self {
        Self {
            message: ChatMessage::new(MessageRole::Assistant, content),
        }
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unsupported LLM type '{tag}'")]
    UnsupportedProvider { tag: String },
    #[error("provider '{provider}' requires an API key")]
    MissingCredential { provider: String },
    #[error("provider '{provider}' requires '{field}'")]
    MissingParameter {
        provider: String,
        field: &'static str,
    },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn unsupported_provider(tag: impl Into<String>) -> Self {
        Self::UnsupportedProvider { tag: tag.into() }
    }

    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
        }
    }

    pub fn missing_parameter(provider: impl Into<String>, field: &'static str) -> Self {
        Self::MissingParameter {
            provider: provider.into(),
            field,
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Message safe to show to API callers
    pub fn user_message(&self) -> String {
        match self {
            ModelError::UnsupportedProvider { tag } => {
                format!("LLM type '{tag}' is not supported.")
            }
            ModelError::MissingCredential { provider } => {
                format!("Provider '{provider}' requires an API key.")
            }
            ModelError::MissingParameter { provider, field } => {
                format!("Provider '{provider}' requires '{field}'.")
            }
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("Could not reach model provider '{provider}'.")
                } else if source.is_timeout() {
                    format!("Request to '{provider}' timed out.")
                } else if let Some(status) = source.status() {
                    match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            format!("Provider '{provider}' rejected the credentials.")
                        }
                        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                            format!("Provider '{provider}' is currently unavailable.")
                        }
                        _ => format!("Request to '{provider}' failed: {}", status.as_u16()),
                    }
                } else {
                    format!("Network error talking to '{provider}'.")
                }
            }
            ModelError::InvalidResponse { provider, .. } => {
                format!("Provider '{provider}' returned an unreadable response.")
            }
        }
    }
}
