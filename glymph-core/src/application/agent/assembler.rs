use super::errors::AssemblyError;
use super::prompt::StructuredPrompt;
use super::runtime::{FallbackAgent, RuntimeAgent, ToolCallingAgent};
use crate::config::AgentSettings;
use crate::domain::AgentConfig;
use crate::model::ClientFactory;
use crate::tooling::ToolSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of one assembly attempt.
pub enum Assembly {
    Assembled(Arc<dyn RuntimeAgent>),
    Degraded {
        agent: Arc<dyn RuntimeAgent>,
        reason: String,
    },
}

impl Assembly {
    pub fn agent(&self) -> Arc<dyn RuntimeAgent> {
        match self {
            Assembly::Assembled(agent) | Assembly::Degraded { agent, .. } => agent.clone(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Assembly::Degraded { .. })
    }
}

/// Builds runtime agents from validated snapshots.
#[derive(Clone)]
pub struct AgentAssembler {
    factory: Arc<dyn ClientFactory>,
    max_tool_steps: usize,
    default_fallback: String,
}

impl AgentAssembler {
    pub fn new(factory: Arc<dyn ClientFactory>, settings: &AgentSettings) -> Self {
        Self {
            factory,
            max_tool_steps: settings.max_tool_steps,
            default_fallback: settings.fallback_message.clone(),
        }
    }

    /// Build the agent, degrading to a [`FallbackAgent`] when the client or
    /// the prompt cannot be built.
    pub fn assemble(&self, config: &AgentConfig, tools: ToolSet) -> Assembly {
        match self.try_assemble(config, tools) {
            Ok(agent) => {
                info!(
                    agent = %config.name,
                    provider = %config.llm_type,
                    tools = agent.tools().len(),
                    "Agent assembled"
                );
                Assembly::Assembled(Arc::new(agent))
            }
            Err(err) => {
                warn!(agent = %config.name, error = %err, "Agent assembly failed, using fallback");
                Assembly::Degraded {
                    agent: Arc::new(FallbackAgent::new(
                        config.name.clone(),
                        self.fallback_message(config),
                    )),
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn try_assemble(
        &self,
        config: &AgentConfig,
        tools: ToolSet,
    ) -> Result<ToolCallingAgent, AssemblyError> {
        let client = self.factory.create(&config.llm_type, &config.llm_config)?;
        let prompt = StructuredPrompt::render(config, &tools)?;
        Ok(ToolCallingAgent::new(
            config.name.clone(),
            client,
            prompt,
            tools,
            self.max_tool_steps,
        ))
    }

    fn fallback_message(&self, config: &AgentConfig) -> String {
        let configured = config.fallback_prompt.trim();
        if configured.is_empty() {
            self.default_fallback.clone()
        } else {
            configured.to_string()
        }
    }
}
