use super::error::ToolInvocationError;
use super::request::build_request;
use crate::domain::ToolConfig;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// A named capability an agent may call with free text.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Run the tool and return its raw textual result.
    async fn call(&self, input: &str) -> Result<String, ToolInvocationError>;
}

/// Tool backed by one outbound HTTP request per call.
#[derive(Clone)]
pub struct HttpTool {
    config: ToolConfig,
    http: Client,
}

impl HttpTool {
    pub fn new(config: ToolConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }
}

#[async_trait]
impl Tool for HttpTool {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    async fn call(&self, input: &str) -> Result<String, ToolInvocationError> {
        let request = build_request(&self.config, input)?;
        let tool = self.config.name.as_str();
        debug!(tool, method = %request.method, url = %request.url, "Dispatching tool request");

        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let transport = |source| ToolInvocationError::Transport {
            tool: tool.to_string(),
            source,
        };
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            warn!(tool, status = status.as_u16(), "Tool returned an error status");
            return Err(ToolInvocationError::Status {
                tool: tool.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
