use crate::constants::{DEFAULT_FALLBACK_MESSAGE, DEFAULT_MAX_TOOL_STEPS};
use serde::Deserialize;

/// Defaults applied when agents are created or invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub max_tool_steps: usize,
    /// Used when an agent is created without its own fallback message
    pub fallback_message: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_tool_steps: DEFAULT_MAX_TOOL_STEPS,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawAgent {
    pub(super) max_tool_steps: Option<usize>,
    pub(super) fallback_message: Option<String>,
}
