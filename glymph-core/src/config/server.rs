use crate::constants::DEFAULT_BIND;
use serde::Deserialize;
use std::net::SocketAddr;

/// REST server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Origins allowed by CORS. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawServer {
    pub(super) bind: Option<String>,
    #[serde(default)]
    pub(super) cors_origins: Vec<String>,
}

impl RawServer {
    pub(super) fn bind_or_default(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }
}
