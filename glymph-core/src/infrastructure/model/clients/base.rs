//! Base HTTP client with shared logic

use crate::infrastructure::model::types::ModelError;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    api_key: String,
    pub http: Client,
}

impl HttpClientBase {
    pub fn new(http: Client, id: impl Into<String>, endpoint: String, api_key: String) -> Self {
        Self {
            id: id.into(),
            endpoint,
            api_key,
            http,
        }
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with bearer auth
    pub async fn post_with_bearer<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.id, e))
    }
}
