use super::tools::{NewTool, ToolRow, insert_tool_with_webhook};
use super::{Store, StoreError};
use crate::domain::{AgentConfig, LlmParams, ToolConfig};
use sqlx::FromRow;
use tracing::debug;

const AGENT_COLUMNS: &str =
    "id, name, description, llm_type, llm_config, prompt_template, fallback_prompt";

#[derive(FromRow)]
struct AgentRow {
    id: String,
    name: String,
    description: String,
    llm_type: String,
    llm_config: String,
    prompt_template: String,
    fallback_prompt: String,
}

impl TryFrom<AgentRow> for AgentConfig {
    type Error = StoreError;

    fn try_from(row: AgentRow) -> Result<Self, Self::Error> {
        let llm_config: LlmParams =
            serde_json::from_str(&row.llm_config).map_err(|err| StoreError::Corrupt {
                entity: "agent",
                key: row.name.clone(),
                reason: err.to_string(),
            })?;
        Ok(AgentConfig {
            id: row.id,
            name: row.name,
            description: row.description,
            llm_type: row.llm_type,
            llm_config,
            prompt_template: row.prompt_template,
            fallback_prompt: row.fallback_prompt,
        })
    }
}

fn encode_params(agent: &AgentConfig) -> Result<String, StoreError> {
    serde_json::to_string(&agent.llm_config).map_err(|err| StoreError::Corrupt {
        entity: "agent",
        key: agent.name.clone(),
        reason: err.to_string(),
    })
}

impl Store {
    /// Persist an agent together with the tools created alongside it. Either
    /// every row is written or none is.
    pub async fn insert_agent(
        &self,
        agent: &AgentConfig,
        tools: &[NewTool],
    ) -> Result<(), StoreError> {
        let llm_config = encode_params(agent)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO agents (id, name, description, llm_type, llm_config, prompt_template, fallback_prompt) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&agent.id)
        .bind(&agent.name)
        .bind(&agent.description)
        .bind(&agent.llm_type)
        .bind(&llm_config)
        .bind(&agent.prompt_template)
        .bind(&agent.fallback_prompt)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::on_write("agent", &agent.name))?;

        for new_tool in tools {
            insert_tool_with_webhook(&mut tx, new_tool).await?;
            sqlx::query("INSERT INTO agent_tools (agent_id, tool_id) VALUES (?, ?)")
                .bind(&agent.id)
                .bind(&new_tool.tool.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!(agent = %agent.name, tools = tools.len(), "Agent stored");
        Ok(())
    }

    pub async fn agent_by_name(&self, name: &str) -> Result<Option<AgentConfig>, StoreError> {
        let row: Option<AgentRow> =
            sqlx::query_as(&format!("SELECT {AGENT_COLUMNS} FROM agents WHERE name = ?"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        row.map(AgentConfig::try_from).transpose()
    }

    pub async fn list_agents(&self) -> Result<Vec<AgentConfig>, StoreError> {
        let rows: Vec<AgentRow> =
            sqlx::query_as(&format!("SELECT {AGENT_COLUMNS} FROM agents ORDER BY name"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(AgentConfig::try_from).collect()
    }

    /// Overwrite every mutable column of the agent identified by `agent.id`.
    pub async fn update_agent(&self, agent: &AgentConfig) -> Result<(), StoreError> {
        let llm_config = encode_params(agent)?;
        let result = sqlx::query(
            "UPDATE agents SET description = ?, llm_type = ?, llm_config = ?, \
             prompt_template = ?, fallback_prompt = ? WHERE id = ?",
        )
        .bind(&agent.description)
        .bind(&agent.llm_type)
        .bind(&llm_config)
        .bind(&agent.prompt_template)
        .bind(&agent.fallback_prompt)
        .bind(&agent.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("agent", &agent.name));
        }
        Ok(())
    }

    pub async fn delete_agent(&self, name: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM agents WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("agent", name));
        }
        Ok(())
    }

    /// Every tool associated with the agent, active or not.
    pub async fn agent_tools(&self, agent_id: &str) -> Result<Vec<ToolConfig>, StoreError> {
        let rows: Vec<ToolRow> = sqlx::query_as(
            "SELECT t.id, t.name, t.description, t.is_active, t.api_key, t.config \
             FROM tools t JOIN agent_tools link ON link.tool_id = t.id \
             WHERE link.agent_id = ? ORDER BY t.name",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ToolConfig::try_from).collect()
    }

    /// Tools both associated with the agent and currently active.
    pub async fn active_tools_for_agent(
        &self,
        agent_id: &str,
    ) -> Result<Vec<ToolConfig>, StoreError> {
        let rows: Vec<ToolRow> = sqlx::query_as(
            "SELECT t.id, t.name, t.description, t.is_active, t.api_key, t.config \
             FROM tools t JOIN agent_tools link ON link.tool_id = t.id \
             WHERE link.agent_id = ? AND t.is_active = 1 ORDER BY t.name",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ToolConfig::try_from).collect()
    }

    /// Associate existing, active tools. Pairs already present are kept as
    /// they are; an unknown or inactive id aborts the whole call.
    pub async fn associate_tools(
        &self,
        agent_id: &str,
        tool_ids: &[String],
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut added = 0;
        for tool_id in tool_ids {
            let active: Option<(bool,)> =
                sqlx::query_as("SELECT is_active FROM tools WHERE id = ?")
                    .bind(tool_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if !matches!(active, Some((true,))) {
                return Err(StoreError::not_found("active tool", tool_id));
            }
            added += sqlx::query(
                "INSERT OR IGNORE INTO agent_tools (agent_id, tool_id) VALUES (?, ?)",
            )
            .bind(agent_id)
            .bind(tool_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(added)
    }

    pub async fn unassociate_tools(
        &self,
        agent_id: &str,
        tool_ids: &[String],
    ) -> Result<u64, StoreError> {
        let mut removed = 0;
        for tool_id in tool_ids {
            removed += sqlx::query("DELETE FROM agent_tools WHERE agent_id = ? AND tool_id = ?")
                .bind(agent_id)
                .bind(tool_id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        }
        Ok(removed)
    }
}
