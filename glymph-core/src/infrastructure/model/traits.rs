//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::domain::LlmParams;
use async_trait::async_trait;
use std::sync::Arc;

/// A configured connection to one provider and one model
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider id used in logs and errors
    fn provider(&self) -> &str;

    /// Model the client generates with
    fn model(&self) -> &str;

    /// Generate the next assistant message for a conversation
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}

/// Builds LLM clients from a provider tag and stored parameters
pub trait ClientFactory: Send + Sync {
    fn create(
        &self,
        provider_tag: &str,
        params: &LlmParams,
    ) -> Result<Arc<dyn LlmClient>, ModelError>;
}
