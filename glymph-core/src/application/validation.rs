//! Fail-fast checks on configuration payloads.
//!
//! Each check returns the first offending field, using dotted paths for
//! nested values (`llm_config.api_key`, `tools[1].config.url`).

use crate::constants::{MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN};
use crate::domain::{
    AgentConfig, AgentConfigInput, InputLocation, LlmParams, NewUser, ToolConfigInput,
    ToolInvocation, WebhookInput,
};
use crate::model::ProviderKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: &'static str) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Rejects blank text.
pub fn required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Every provider needs a key. Hosted hubs also need a repository. Unknown
/// tags pass here; they are reported when the agent is assembled.
fn check_provider(llm_type: &str, params: &LlmParams) -> Result<(), ValidationError> {
    required("llm_type", llm_type)?;
    if params.credential().is_none() {
        return Err(ValidationError::new("llm_config.api_key", "is required"));
    }
    if matches!(
        ProviderKind::from_tag(llm_type),
        Ok(ProviderKind::HostedInferenceHub)
    ) {
        let has_repo = [&params.repo_id, &params.model_name]
            .iter()
            .any(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()));
        if !has_repo {
            return Err(ValidationError::new(
                "llm_config.repo_id",
                "is required for hosted inference hubs",
            ));
        }
    }
    Ok(())
}

/// A URL-placed input needs its `{input_key}` placeholder in the URL.
pub fn validate_invocation(prefix: &str, config: &ToolInvocation) -> Result<(), ValidationError> {
    required(&format!("{prefix}url"), &config.url)?;
    required(&format!("{prefix}input_key"), &config.input_key)?;
    if config.input_location == InputLocation::Url
        && !config.url.contains(&format!("{{{}}}", config.input_key))
    {
        return Err(ValidationError::new(
            format!("{prefix}url"),
            "must contain the {input_key} placeholder",
        ));
    }
    Ok(())
}

fn check_tool(prefix: &str, tool: &ToolConfigInput) -> Result<(), ValidationError> {
    required(&format!("{prefix}name"), &tool.name)?;
    validate_invocation(&format!("{prefix}config."), &tool.config)
}

pub fn validate_agent_input(input: &AgentConfigInput) -> Result<(), ValidationError> {
    required("name", &input.name)?;
    check_provider(&input.llm_type, &input.llm_config)?;
    required("prompt_template", &input.prompt_template)?;
    for (index, tool) in input.tools.iter().enumerate() {
        check_tool(&format!("tools[{index}]."), tool)?;
    }
    Ok(())
}

/// Re-check of a stored snapshot before it is assembled.
pub fn validate_agent(agent: &AgentConfig) -> Result<(), ValidationError> {
    required("name", &agent.name)?;
    check_provider(&agent.llm_type, &agent.llm_config)?;
    required("prompt_template", &agent.prompt_template)
}

pub fn validate_tool_input(tool: &ToolConfigInput) -> Result<(), ValidationError> {
    check_tool("", tool)
}

pub fn validate_webhook_input(webhook: &WebhookInput) -> Result<(), ValidationError> {
    required("url", &webhook.url)
}

pub fn validate_new_user(user: &NewUser) -> Result<(), ValidationError> {
    let username_len = user.username.trim().chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username_len) {
        return Err(ValidationError::new(
            "username",
            "must be between 3 and 50 characters",
        ));
    }
    if !user.email.contains('@') {
        return Err(ValidationError::new("email", "must be an email address"));
    }
    validate_password("password", &user.password)
}

pub fn validate_password(field: &str, password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(field, "must be at least 6 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot() -> AgentConfigInput {
        AgentConfigInput {
            name: "Bot".to_string(),
            llm_type: "openai-compatible".to_string(),
            llm_config: LlmParams {
                api_key: Some("k".to_string()),
                ..LlmParams::default()
            },
            prompt_template: "You are helpful.".to_string(),
            ..AgentConfigInput::default()
        }
    }

    #[test]
    fn complete_input_passes() {
        assert_eq!(validate_agent_input(&bot()), Ok(()));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut input = bot();
        input.name = " ".to_string();
        input.prompt_template.clear();
        assert_eq!(validate_agent_input(&input).unwrap_err().field, "name");
    }

    #[test]
    fn blank_key_is_missing_credential() {
        let mut input = bot();
        input.llm_config.api_key = Some("  ".to_string());
        assert_eq!(
            validate_agent_input(&input).unwrap_err().field,
            "llm_config.api_key"
        );
    }

    #[test]
    fn hub_needs_a_repository() {
        let mut input = bot();
        input.llm_type = "huggingface".to_string();
        assert_eq!(
            validate_agent_input(&input).unwrap_err().field,
            "llm_config.repo_id"
        );
        input.llm_config.model_name = Some("org/model".to_string());
        assert_eq!(validate_agent_input(&input), Ok(()));
    }

    #[test]
    fn unknown_provider_is_left_to_assembly() {
        let mut input = bot();
        input.llm_type = "unknown-llm".to_string();
        assert_eq!(validate_agent_input(&input), Ok(()));
    }

    #[test]
    fn inline_tool_without_url_is_indexed() {
        let mut input = bot();
        input.tools = vec![
            ToolConfigInput {
                name: "weather".to_string(),
                config: ToolInvocation {
                    url: "https://x/weather".to_string(),
                    input_key: "q".to_string(),
                    ..ToolInvocation::default()
                },
                ..ToolConfigInput::default()
            },
            ToolConfigInput {
                name: "news".to_string(),
                ..ToolConfigInput::default()
            },
        ];
        assert_eq!(
            validate_agent_input(&input).unwrap_err().field,
            "tools[1].config.url"
        );
    }

    #[test]
    fn url_input_needs_its_placeholder() {
        let mut invocation = ToolInvocation {
            url: "https://x/weather".to_string(),
            input_location: InputLocation::Url,
            input_key: "q".to_string(),
            ..ToolInvocation::default()
        };
        assert_eq!(
            validate_invocation("config.", &invocation).unwrap_err().field,
            "config.url"
        );

        invocation.url = "https://x/weather/{q}".to_string();
        assert_eq!(validate_invocation("config.", &invocation), Ok(()));
    }

    #[test]
    fn short_username_is_rejected() {
        let user = NewUser {
            username: "al".to_string(),
            email: "al@x.io".to_string(),
            password: "secret1".to_string(),
        };
        assert_eq!(validate_new_user(&user).unwrap_err().field, "username");
    }
}
