use crate::model::ModelError;
use crate::tooling::ToolInvocationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("unterminated placeholder at byte {position}")]
    Unterminated { position: usize },
    #[error("unknown placeholder '{name}'")]
    UnknownPlaceholder { name: String },
}

/// Raised while building an agent. Never returned to API callers: the
/// assembler logs it and substitutes a fallback agent.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("invalid prompt template: {0}")]
    Prompt(#[from] PromptError),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Tool(#[from] ToolInvocationError),
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
    #[error("agent did not finish within {max} tool calls")]
    StepLimit { max: usize },
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Model(err) => err.user_message(),
            AgentError::Tool(err) => format!("Tool \"{}\" failed.", err.tool()),
            AgentError::UnknownTool(name) => format!("Tool \"{name}\" is not available."),
            AgentError::InvalidResponse(_) => {
                "The model returned a response that could not be understood.".to_string()
            }
            AgentError::StepLimit { .. } => {
                "The agent did not reach an answer in time.".to_string()
            }
        }
    }
}
