//! Tool and webhook management.

use crate::application::error::ServiceError;
use crate::domain::{
    ToolConfig, ToolConfigInput, ToolUpdate, WebhookConfig, WebhookInput, WebhookUpdate,
};
use crate::store::{NewTool, Store};
use crate::validation::{
    ValidationError, validate_invocation, validate_tool_input, validate_webhook_input,
};
use tracing::info;
use uuid::Uuid;

/// Turn a tool payload into rows: a fresh id, and a webhook when
/// `webhook_url` is given.
pub(crate) fn prepare_tool(input: ToolConfigInput) -> NewTool {
    let id = Uuid::new_v4().to_string();
    let webhook = input
        .webhook_url
        .filter(|url| !url.trim().is_empty())
        .map(|url| WebhookConfig {
            id: Uuid::new_v4().to_string(),
            tool_id: Some(id.clone()),
            url,
            api_key: String::new(),
            description: format!("Webhook for {}", input.name.trim()),
            is_active: true,
        });
    NewTool {
        tool: ToolConfig {
            id,
            name: input.name.trim().to_string(),
            description: input.description,
            is_active: input.is_active,
            api_key: input.api_key,
            config: input.config,
        },
        webhook,
    }
}

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_tool(&self, input: ToolConfigInput) -> Result<ToolConfig, ServiceError> {
        validate_tool_input(&input)?;
        let new_tool = prepare_tool(input);
        self.store.insert_tool(&new_tool).await?;
        info!(tool = %new_tool.tool.name, "Tool created");
        Ok(new_tool.tool)
    }

    pub async fn tool(&self, id: &str) -> Result<ToolConfig, ServiceError> {
        self.store
            .tool(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("tool", id))
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolConfig>, ServiceError> {
        Ok(self.store.list_tools().await?)
    }

    pub async fn update_tool(&self, id: &str, update: ToolUpdate) -> Result<ToolConfig, ServiceError> {
        let mut tool = self.tool(id).await?;
        update.apply(&mut tool);
        validate_invocation("config.", &tool.config)?;
        self.store
            .update_tool(&tool, update.webhook_url.as_deref())
            .await?;
        info!(tool = %tool.name, "Tool updated");
        Ok(tool)
    }

    pub async fn delete_tool(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete_tool(id).await?;
        info!(tool_id = %id, "Tool deleted");
        Ok(())
    }

    /// Copy a tool under `<name>_copy`. The webhook stays with the original.
    pub async fn duplicate_tool(&self, id: &str) -> Result<ToolConfig, ServiceError> {
        let original = self.tool(id).await?;
        let copy = NewTool {
            tool: ToolConfig {
                id: Uuid::new_v4().to_string(),
                name: format!("{}_copy", original.name),
                ..original
            },
            webhook: None,
        };
        self.store.insert_tool(&copy).await?;
        info!(tool = %copy.tool.name, "Tool duplicated");
        Ok(copy.tool)
    }

    pub async fn set_tool_active(&self, id: &str, is_active: bool) -> Result<ToolConfig, ServiceError> {
        self.store.set_tool_active(id, is_active).await?;
        info!(tool_id = %id, is_active, "Tool activation changed");
        self.tool(id).await
    }

    pub async fn tool_webhooks(&self, id: &str) -> Result<Vec<WebhookConfig>, ServiceError> {
        self.tool(id).await?;
        Ok(self.store.webhooks_for_tool(id).await?)
    }

    pub async fn create_webhook(&self, input: WebhookInput) -> Result<WebhookConfig, ServiceError> {
        validate_webhook_input(&input)?;
        let webhook = WebhookConfig {
            id: Uuid::new_v4().to_string(),
            tool_id: input.tool_id.filter(|id| !id.trim().is_empty()),
            url: input.url.trim().to_string(),
            api_key: input.api_key,
            description: input.description,
            is_active: input.is_active,
        };
        self.store.insert_webhook(&webhook).await?;
        info!(webhook_id = %webhook.id, "Webhook created");
        Ok(webhook)
    }

    pub async fn webhook(&self, id: &str) -> Result<WebhookConfig, ServiceError> {
        self.store
            .webhook(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("webhook", id))
    }

    pub async fn list_webhooks(&self) -> Result<Vec<WebhookConfig>, ServiceError> {
        Ok(self.store.list_webhooks().await?)
    }

    pub async fn update_webhook(
        &self,
        id: &str,
        update: WebhookUpdate,
    ) -> Result<WebhookConfig, ServiceError> {
        let mut webhook = self.webhook(id).await?;
        update.apply(&mut webhook);
        if webhook.url.trim().is_empty() {
            return Err(ValidationError::new("url", "must not be empty").into());
        }
        self.store.update_webhook(&webhook).await?;
        info!(webhook_id = %webhook.id, "Webhook updated");
        Ok(webhook)
    }

    pub async fn delete_webhook(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete_webhook(id).await?;
        info!(webhook_id = %id, "Webhook deleted");
        Ok(())
    }

    pub async fn link_webhook(&self, id: &str, tool_id: &str) -> Result<WebhookConfig, ServiceError> {
        let webhook = self.store.link_webhook(id, tool_id).await?;
        info!(webhook_id = %id, tool_id = %tool_id, "Webhook linked");
        Ok(webhook)
    }
}
