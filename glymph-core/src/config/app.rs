use super::agent::AgentSettings;
use super::auth::AuthConfig;
use super::database::DatabaseConfig;
use super::error::ConfigError;
use super::server::ServerConfig;
use std::path::Path;

/// Application configuration loaded from glymph.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub agent: AgentSettings,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text; `origin` is only used in errors.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, origin)
    }

    /// Defaults with the given signing secret, backed by an in-memory database.
    pub fn ephemeral(secret: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::in_memory(),
            auth: AuthConfig::new(secret),
            agent: AgentSettings::default(),
        }
    }
}
