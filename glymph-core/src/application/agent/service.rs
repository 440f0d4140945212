use super::assembler::{AgentAssembler, Assembly};
use super::registry::AgentRegistry;
use crate::application::catalog::prepare_tool;
use crate::application::error::ServiceError;
use crate::config::AgentSettings;
use crate::domain::{AgentConfig, AgentConfigInput, AgentUpdate, ToolConfig};
use crate::model::ClientFactory;
use crate::store::Store;
use crate::tooling::resolve_tools;
use crate::validation::{validate_agent, validate_agent_input};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

/// Answer produced by an agent invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AgentReply {
    pub response: String,
}

/// Persistence and invocation façade for agents.
#[derive(Clone)]
pub struct AgentService {
    store: Store,
    assembler: AgentAssembler,
    http: Client,
    settings: AgentSettings,
}

impl AgentService {
    pub fn new(
        store: Store,
        factory: Arc<dyn ClientFactory>,
        http: Client,
        settings: AgentSettings,
    ) -> Self {
        Self {
            store,
            assembler: AgentAssembler::new(factory, &settings),
            http,
            settings,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Validate and persist an agent with its inline tools. No client is
    /// built here.
    pub async fn create(&self, input: AgentConfigInput) -> Result<String, ServiceError> {
        validate_agent_input(&input)?;

        let fallback_prompt = input
            .fallback_prompt
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| self.settings.fallback_message.clone());
        let agent = AgentConfig {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description,
            llm_type: input.llm_type.trim().to_string(),
            llm_config: input.llm_config,
            prompt_template: input.prompt_template,
            fallback_prompt,
        };
        let tools: Vec<_> = input.tools.into_iter().map(prepare_tool).collect();

        self.store.insert_agent(&agent, &tools).await?;
        info!(agent = %agent.name, tools = tools.len(), "Agent created");
        Ok(agent.id)
    }

    pub async fn get(&self, name: &str) -> Result<AgentConfig, ServiceError> {
        self.store
            .agent_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::not_found("agent", name))
    }

    pub async fn list(&self) -> Result<Vec<AgentConfig>, ServiceError> {
        Ok(self.store.list_agents().await?)
    }

    /// Apply the allow-listed fields and re-validate before writing.
    pub async fn update(
        &self,
        name: &str,
        update: AgentUpdate,
    ) -> Result<AgentConfig, ServiceError> {
        let mut agent = self.get(name).await?;
        if update.is_empty() {
            return Ok(agent);
        }
        update.apply(&mut agent);
        validate_agent(&agent)?;
        self.store.update_agent(&agent).await?;
        info!(agent = %agent.name, "Agent updated");
        Ok(agent)
    }

    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        self.store.delete_agent(name).await?;
        info!(agent = %name, "Agent deleted");
        Ok(())
    }

    pub async fn tools(&self, name: &str) -> Result<Vec<ToolConfig>, ServiceError> {
        let agent = self.get(name).await?;
        Ok(self.store.agent_tools(&agent.id).await?)
    }

    pub async fn associate_tools(
        &self,
        name: &str,
        tool_ids: &[String],
    ) -> Result<u64, ServiceError> {
        let agent = self.get(name).await?;
        Ok(self.store.associate_tools(&agent.id, tool_ids).await?)
    }

    pub async fn unassociate_tools(
        &self,
        name: &str,
        tool_ids: &[String],
    ) -> Result<u64, ServiceError> {
        let agent = self.get(name).await?;
        Ok(self.store.unassociate_tools(&agent.id, tool_ids).await?)
    }

    /// Load, re-validate and assemble. Definitional problems with the stored
    /// snapshot are rejected; anything failing during assembly degrades.
    pub async fn resolve(&self, name: &str) -> Result<Assembly, ServiceError> {
        let agent = self.get(name).await?;
        validate_agent(&agent)?;
        let descriptors = self.store.active_tools_for_agent(&agent.id).await?;
        let tools = resolve_tools(&descriptors, &self.http);
        Ok(self.assembler.assemble(&agent, tools))
    }

    pub async fn resolve_and_invoke(
        &self,
        name: &str,
        input: &str,
    ) -> Result<AgentReply, ServiceError> {
        let assembly = self.resolve(name).await?;
        let agent = assembly.agent();
        let response = agent.invoke(input).await.inspect_err(|err| {
            error!(agent = %name, error = %err, "Agent invocation failed");
        })?;
        Ok(AgentReply { response })
    }

    /// Invoke through a caller-owned registry, assembling the agent only the
    /// first time it is asked for in that registry.
    pub async fn invoke_in(
        &self,
        registry: &mut AgentRegistry,
        name: &str,
        input: &str,
    ) -> Result<AgentReply, ServiceError> {
        let agent = match registry.get(name) {
            Some(agent) => agent,
            None => {
                let agent = self.resolve(name).await?.agent();
                registry.insert(agent.clone());
                agent
            }
        };
        let response = agent.invoke(input).await.inspect_err(|err| {
            error!(agent = %name, error = %err, "Agent invocation failed");
        })?;
        Ok(AgentReply { response })
    }
}
