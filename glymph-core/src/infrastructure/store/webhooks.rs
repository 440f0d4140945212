use super::{Store, StoreError};
use crate::domain::WebhookConfig;
use sqlx::{FromRow, SqliteConnection};

const WEBHOOK_COLUMNS: &str = "id, tool_id, url, api_key, description, is_active";

#[derive(FromRow)]
pub(super) struct WebhookRow {
    id: String,
    tool_id: Option<String>,
    url: String,
    api_key: String,
    description: String,
    is_active: bool,
}

impl From<WebhookRow> for WebhookConfig {
    fn from(row: WebhookRow) -> Self {
        WebhookConfig {
            id: row.id,
            tool_id: row.tool_id,
            url: row.url,
            api_key: row.api_key,
            description: row.description,
            is_active: row.is_active,
        }
    }
}

/// A tool owns at most one webhook; a second one is a conflict on the tool.
pub(super) async fn insert_webhook_row(
    conn: &mut SqliteConnection,
    webhook: &WebhookConfig,
) -> Result<(), StoreError> {
    let key = webhook.tool_id.as_deref().unwrap_or(&webhook.id);
    sqlx::query(
        "INSERT INTO webhooks (id, tool_id, url, api_key, description, is_active) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&webhook.id)
    .bind(&webhook.tool_id)
    .bind(&webhook.url)
    .bind(&webhook.api_key)
    .bind(&webhook.description)
    .bind(webhook.is_active)
    .execute(conn)
    .await
    .map_err(StoreError::on_write("webhook for tool", key))?;
    Ok(())
}

impl Store {
    pub async fn insert_webhook(&self, webhook: &WebhookConfig) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        if let Some(tool_id) = &webhook.tool_id {
            let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM tools WHERE id = ?")
                .bind(tool_id)
                .fetch_optional(&mut *conn)
                .await?;
            if exists.is_none() {
                return Err(StoreError::not_found("tool", tool_id));
            }
        }
        insert_webhook_row(&mut conn, webhook).await
    }

    pub async fn webhook(&self, id: &str) -> Result<Option<WebhookConfig>, StoreError> {
        let row: Option<WebhookRow> =
            sqlx::query_as(&format!("SELECT {WEBHOOK_COLUMNS} FROM webhooks WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(WebhookConfig::from))
    }

    pub async fn list_webhooks(&self) -> Result<Vec<WebhookConfig>, StoreError> {
        let rows: Vec<WebhookRow> =
            sqlx::query_as(&format!("SELECT {WEBHOOK_COLUMNS} FROM webhooks ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(WebhookConfig::from).collect())
    }

    pub async fn update_webhook(&self, webhook: &WebhookConfig) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE webhooks SET url = ?, api_key = ?, description = ?, is_active = ? WHERE id = ?",
        )
        .bind(&webhook.url)
        .bind(&webhook.api_key)
        .bind(&webhook.description)
        .bind(webhook.is_active)
        .bind(&webhook.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("webhook", &webhook.id));
        }
        Ok(())
    }

    pub async fn delete_webhook(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM webhooks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("webhook", id));
        }
        Ok(())
    }

    /// Bind a webhook to a tool. Relinking the tool's own webhook is a no-op;
    /// a tool that already owns a different webhook is a conflict.
    pub async fn link_webhook(&self, id: &str, tool_id: &str) -> Result<WebhookConfig, StoreError> {
        let mut webhook = self
            .webhook(id)
            .await?
            .ok_or_else(|| StoreError::not_found("webhook", id))?;
        if self.tool(tool_id).await?.is_none() {
            return Err(StoreError::not_found("tool", tool_id));
        }
        sqlx::query("UPDATE webhooks SET tool_id = ? WHERE id = ?")
            .bind(tool_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write("webhook for tool", tool_id))?;
        webhook.tool_id = Some(tool_id.to_string());
        Ok(webhook)
    }
}
