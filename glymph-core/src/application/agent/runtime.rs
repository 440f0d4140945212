use super::directive::{AgentDirective, parse_directive};
use super::errors::AgentError;
use super::prompt::StructuredPrompt;
use crate::model::{LlmClient, ModelRequest};
use crate::tooling::ToolSet;
use crate::types::ChatMessage;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An assembled agent, ready to answer one input at a time.
#[async_trait]
pub trait RuntimeAgent: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(&self, input: &str) -> Result<String, AgentError>;
}

/// Prompt-driven agent. Without tools it returns the model's reply as is;
/// with tools it runs the JSON directive loop, feeding each tool result back
/// through the scratchpad until the model answers or the step budget runs out.
pub struct ToolCallingAgent {
    name: String,
    client: Arc<dyn LlmClient>,
    prompt: StructuredPrompt,
    tools: ToolSet,
    max_steps: usize,
}

impl ToolCallingAgent {
    pub fn new(
        name: impl Into<String>,
        client: Arc<dyn LlmClient>,
        prompt: StructuredPrompt,
        tools: ToolSet,
        max_steps: usize,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            prompt,
            tools,
            max_steps,
        }
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn prompt(&self) -> &StructuredPrompt {
        &self.prompt
    }

    async fn generate(
        &self,
        input: &str,
        scratchpad: &[ChatMessage],
    ) -> Result<String, AgentError> {
        let request = ModelRequest::new(self.prompt.messages(&[], input, scratchpad));
        let response = self.client.generate(request).await?;
        Ok(response.message.content)
    }
}

#[async_trait]
impl RuntimeAgent for ToolCallingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        let mut scratchpad = Vec::new();

        if self.tools.is_empty() {
            return self.generate(input, &scratchpad).await;
        }

        for step in 0..=self.max_steps {
            let content = self.generate(input, &scratchpad).await?;
            let (tool_name, tool_input) = match parse_directive(&content) {
                Ok(AgentDirective::Final { response }) => return Ok(response),
                Ok(AgentDirective::CallTool { tool, input }) => (tool, input),
                Err(err) => {
                    debug!(agent = %self.name, error = %err, "Reply is not a directive, returning it as final");
                    return Ok(content);
                }
            };

            if step == self.max_steps {
                break;
            }

            let Some(tool) = self.tools.get(&tool_name) else {
                warn!(agent = %self.name, requested_tool = %tool_name, "Unknown tool requested by agent");
                return Err(AgentError::UnknownTool(tool_name));
            };

            let output = tool.call(&tool_input).await.inspect_err(|err| {
                warn!(agent = %self.name, tool = %tool.name(), error = %err, "Tool execution failed");
            })?;
            info!(agent = %self.name, tool = %tool.name(), step, "Tool executed");

            scratchpad.push(ChatMessage::assistant(content));
            scratchpad.push(ChatMessage::user(
                json!({
                    "action": "tool_result",
                    "tool": tool.name(),
                    "output": output,
                })
                .to_string(),
            ));
        }

        warn!(agent = %self.name, max_steps = self.max_steps, "Tool step budget exhausted");
        Err(AgentError::StepLimit {
            max: self.max_steps,
        })
    }
}

/// Degenerate agent that answers every input with a fixed message.
pub struct FallbackAgent {
    name: String,
    message: String,
}

impl FallbackAgent {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl RuntimeAgent for FallbackAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _input: &str) -> Result<String, AgentError> {
        Ok(self.message.clone())
    }
}
