use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolInvocationError {
    #[error("tool '{tool}' has no endpoint configured")]
    NoEndpoint { tool: String },
    #[error("tool '{tool}' has an invalid url '{url}': {reason}")]
    InvalidUrl {
        tool: String,
        url: String,
        reason: String,
    },
    #[error("tool '{tool}' has an invalid header '{name}'")]
    InvalidHeader { tool: String, name: String },
    #[error("tool '{tool}' transport error: {source}")]
    Transport {
        tool: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("tool '{tool}' returned status {status}")]
    Status {
        tool: String,
        status: u16,
        body: String,
    },
}

impl ToolInvocationError {
    pub fn tool(&self) -> &str {
        match self {
            ToolInvocationError::NoEndpoint { tool }
            | ToolInvocationError::InvalidUrl { tool, .. }
            | ToolInvocationError::InvalidHeader { tool, .. }
            | ToolInvocationError::Transport { tool, .. }
            | ToolInvocationError::Status { tool, .. } => tool,
        }
    }
}
