use super::errors::PromptError;
use crate::domain::AgentConfig;
use crate::tooling::ToolSet;
use crate::types::ChatMessage;

const TOOL_GUIDANCE: &str = "{{tool_guidance}}";

/// A rendered system instruction plus slots for conversation history and the
/// agent's scratch reasoning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredPrompt {
    system: String,
}

impl StructuredPrompt {
    /// Render `agent.prompt_template`. Recognised placeholders are
    /// `{{agent_name}}`, `{{agent_description}}` and `{{tool_guidance}}`.
    /// When tools are bound and the template does not place the guidance
    /// itself, it is appended after the template.
    pub fn render(agent: &AgentConfig, tools: &ToolSet) -> Result<Self, PromptError> {
        let template = agent.prompt_template.as_str();
        let guidance = tool_guidance(tools);
        let mut system = String::with_capacity(template.len());
        let mut rest = template;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            system.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or(PromptError::Unterminated {
                position: offset + start,
            })?;
            let name = after[..end].trim();
            match name {
                "agent_name" => system.push_str(&agent.name),
                "agent_description" => system.push_str(&agent.description),
                "tool_guidance" => system.push_str(&guidance),
                other => {
                    return Err(PromptError::UnknownPlaceholder {
                        name: other.to_string(),
                    });
                }
            }
            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        system.push_str(rest);

        if !tools.is_empty() && !template.contains(TOOL_GUIDANCE) {
            system.push_str("\n\n");
            system.push_str(&guidance);
        }

        Ok(Self { system })
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// Messages for one model turn: system instruction, history, the input,
    /// then whatever the agent has reasoned so far.
    pub fn messages(
        &self,
        history: &[ChatMessage],
        input: &str,
        scratchpad: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + scratchpad.len() + 2);
        messages.push(ChatMessage::system(self.system.clone()));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(input));
        messages.extend_from_slice(scratchpad);
        messages
    }
}

fn tool_guidance(tools: &ToolSet) -> String {
    if tools.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "You can call tools to answer the user.".to_string(),
        "To call a tool, respond only with: {\"action\":\"call_tool\",\"tool\":\"tool_name\",\"input\":\"text for the tool\"}."
            .to_string(),
        "When you have the final answer, respond only with: {\"action\":\"final\",\"response\":\"...\"}."
            .to_string(),
        "Available tools:".to_string(),
    ];
    for tool in tools.iter() {
        let description = tool.description().trim();
        if description.is_empty() {
            lines.push(format!("- {}", tool.name()));
        } else {
            lines.push(format!("- {}: {}", tool.name(), description));
        }
    }
    lines.join("\n")
}
