//! Message adapters - convert between different API formats

use crate::types::{ChatMessage, MessageRole};
use serde_json::{Value, json};

/// Conversation split the way Cohere's chat endpoint expects it
#[derive(Debug, Clone, PartialEq)]
pub struct CohereConversation {
    pub preamble: Option<String>,
    pub history: Vec<Value>,
    pub message: String,
}

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format
    /// Returns: [{"role": "...", "content": "..."}]
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.clone()
                })
            })
            .collect()
    }

    /// System messages become the preamble, the last user message becomes
    /// `message` and everything before it becomes `chat_history`.
    pub fn to_cohere_format(messages: &[ChatMessage]) -> CohereConversation {
        let mut system_parts = Vec::new();
        let mut turns: Vec<&ChatMessage> = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => system_parts.push(message.content.clone()),
                MessageRole::User | MessageRole::Assistant => turns.push(message),
            }
        }

        let last_user = turns.iter().rposition(|m| m.role == MessageRole::User);
        let message = last_user
            .map(|index| turns.remove(index).content.clone())
            .unwrap_or_default();

        let history = turns
            .into_iter()
            .map(|m| {
                let role = match m.role {
                    MessageRole::Assistant => "CHATBOT",
                    _ => "USER",
                };
                json!({ "role": role, "message": m.content.clone() })
            })
            .collect();

        CohereConversation {
            preamble: if system_parts.is_empty() {
                None
            } else {
                Some(system_parts.join("\n\n"))
            },
            history,
            message,
        }
    }

    /// Flatten a conversation into a single completion prompt
    pub fn to_plain_prompt(messages: &[ChatMessage]) -> String {
        let mut prompt = String::new();
        for message in messages {
            let label = match message.role {
                MessageRole::System => "System",
                MessageRole::User => "User",
                MessageRole::Assistant => "Assistant",
            };
            prompt.push_str(label);
            prompt.push_str(": ");
            prompt.push_str(&message.content);
            prompt.push('\n');
        }
        prompt.push_str("Assistant:");
        prompt
    }
}
