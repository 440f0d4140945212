use super::webhooks::WebhookRow;
use super::{Store, StoreError};
use crate::domain::{ToolConfig, ToolInvocation, WebhookConfig};
use sqlx::{FromRow, Sqlite, Transaction};
use tracing::debug;

const TOOL_COLUMNS: &str = "id, name, description, is_active, api_key, config";

/// A tool about to be written, with the webhook created alongside it.
#[derive(Debug, Clone)]
pub struct NewTool {
    pub tool: ToolConfig,
    pub webhook: Option<WebhookConfig>,
}

#[derive(FromRow)]
pub(super) struct ToolRow {
    id: String,
    name: String,
    description: String,
    is_active: bool,
    api_key: Option<String>,
    config: String,
}

impl TryFrom<ToolRow> for ToolConfig {
    type Error = StoreError;

    fn try_from(row: ToolRow) -> Result<Self, Self::Error> {
        let config: ToolInvocation =
            serde_json::from_str(&row.config).map_err(|err| StoreError::Corrupt {
                entity: "tool",
                key: row.id.clone(),
                reason: err.to_string(),
            })?;
        Ok(ToolConfig {
            id: row.id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            api_key: row.api_key,
            config,
        })
    }
}

fn encode_invocation(tool: &ToolConfig) -> Result<String, StoreError> {
    serde_json::to_string(&tool.config).map_err(|err| StoreError::Corrupt {
        entity: "tool",
        key: tool.id.clone(),
        reason: err.to_string(),
    })
}

pub(super) async fn insert_tool_with_webhook(
    tx: &mut Transaction<'_, Sqlite>,
    new_tool: &NewTool,
) -> Result<(), StoreError> {
    let tool = &new_tool.tool;
    let config = encode_invocation(tool)?;
    sqlx::query(
        "INSERT INTO tools (id, name, description, is_active, api_key, config) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&tool.id)
    .bind(&tool.name)
    .bind(&tool.description)
    .bind(tool.is_active)
    .bind(&tool.api_key)
    .bind(&config)
    .execute(&mut **tx)
    .await
    .map_err(StoreError::on_write("tool", &tool.name))?;

    if let Some(webhook) = &new_tool.webhook {
        super::webhooks::insert_webhook_row(&mut **tx, webhook).await?;
    }
    Ok(())
}

impl Store {
    pub async fn insert_tool(&self, new_tool: &NewTool) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        insert_tool_with_webhook(&mut tx, new_tool).await?;
        tx.commit().await?;
        debug!(tool = %new_tool.tool.name, "Tool stored");
        Ok(())
    }

    pub async fn tool(&self, id: &str) -> Result<Option<ToolConfig>, StoreError> {
        let row: Option<ToolRow> =
            sqlx::query_as(&format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(ToolConfig::try_from).transpose()
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolConfig>, StoreError> {
        let rows: Vec<ToolRow> =
            sqlx::query_as(&format!("SELECT {TOOL_COLUMNS} FROM tools ORDER BY name"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(ToolConfig::try_from).collect()
    }

    /// Overwrite the tool row and, when `webhook_url` is given, the url of the
    /// webhook the tool owns.
    pub async fn update_tool(
        &self,
        tool: &ToolConfig,
        webhook_url: Option<&str>,
    ) -> Result<(), StoreError> {
        let config = encode_invocation(tool)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE tools SET description = ?, is_active = ?, api_key = ?, config = ? WHERE id = ?",
        )
        .bind(&tool.description)
        .bind(tool.is_active)
        .bind(&tool.api_key)
        .bind(&config)
        .bind(&tool.id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("tool", &tool.id));
        }
        if let Some(url) = webhook_url {
            sqlx::query("UPDATE webhooks SET url = ? WHERE tool_id = ?")
                .bind(url)
                .bind(&tool.id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn set_tool_active(&self, id: &str, is_active: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE tools SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("tool", id));
        }
        Ok(())
    }

    /// Removes the tool, its webhook and every agent association.
    pub async fn delete_tool(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tools WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("tool", id));
        }
        Ok(())
    }

    pub async fn webhooks_for_tool(&self, tool_id: &str) -> Result<Vec<WebhookConfig>, StoreError> {
        let rows: Vec<WebhookRow> = sqlx::query_as(
            "SELECT id, tool_id, url, api_key, description, is_active FROM webhooks WHERE tool_id = ?",
        )
        .bind(tool_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(WebhookConfig::from).collect())
    }
}
