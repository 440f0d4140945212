pub mod agent;
pub mod app;
pub mod auth;
pub mod database;
pub mod error;
pub mod loader;
pub mod server;

pub use crate::constants::CONFIG_PATH;

pub use agent::AgentSettings;
pub use app::AppConfig;
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use server::ServerConfig;
