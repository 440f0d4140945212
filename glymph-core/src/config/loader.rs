use super::CONFIG_PATH;
use super::agent::{AgentSettings, RawAgent};
use super::auth::{AuthConfig, RawAuth};
use super::database::{DatabaseConfig, RawDatabase};
use super::error::ConfigError;
use super::server::{RawServer, ServerConfig};
use crate::constants::{DATABASE_URL_ENV, DEFAULT_JWT_SECRET_ENV, ENV_PATH};
use chrono::Duration;
use dotenvy::from_filename;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub database: RawDatabase,
    #[serde(default)]
    pub auth: RawAuth,
    #[serde(default)]
    pub agent: RawAgent,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration from a file path.
///
/// An explicit path must exist. When no path is given and the default file is
/// absent, built-in defaults are used and only the JWT secret has to come from
/// the environment.
pub fn load_config(path: Option<&Path>) -> Result<super::AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                info!(path = CONFIG_PATH, "No configuration file, using defaults");
                validate_and_build(RawConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<super::AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(content: &str, origin: &Path) -> Result<super::AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<super::AppConfig, ConfigError> {
    let RawConfig {
        server,
        database,
        auth,
        agent,
    } = parsed;

    let bind_value = server.bind_or_default().to_string();
    let bind: SocketAddr = bind_value
        .parse()
        .map_err(|_| ConfigError::InvalidBind { value: bind_value })?;
    let server = ServerConfig {
        bind,
        cors_origins: server.cors_origins,
    };

    let database = build_database(database)?;
    let auth = build_auth(auth)?;

    let mut settings = AgentSettings::default();
    if let Some(steps) = agent.max_tool_steps {
        settings.max_tool_steps = steps;
    }
    if let Some(message) = agent.fallback_message {
        if message.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "agent.fallback_message",
                reason: "must not be empty".into(),
            });
        }
        settings.fallback_message = message;
    }

    Ok(super::AppConfig {
        server,
        database,
        auth,
        agent: settings,
    })
}

fn build_database(raw: RawDatabase) -> Result<DatabaseConfig, ConfigError> {
    let mut config = DatabaseConfig::default();
    if let Some(url) = raw.url {
        config.url = url;
    }
    if let Ok(url) = env::var(DATABASE_URL_ENV) {
        if !url.trim().is_empty() {
            debug!(env_var = DATABASE_URL_ENV, "Database URL taken from environment");
            config.url = url;
        }
    }
    config.url = shellexpand::tilde(&config.url).into_owned();
    if let Some(max) = raw.max_connections {
        if max == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections",
                reason: "must be at least 1".into(),
            });
        }
        config.max_connections = max;
    }
    Ok(config)
}

fn build_auth(raw: RawAuth) -> Result<AuthConfig, ConfigError> {
    let env_name = raw
        .secret_env
        .clone()
        .unwrap_or_else(|| DEFAULT_JWT_SECRET_ENV.to_string());
    let secret = raw
        .secret
        .filter(|secret| !secret.trim().is_empty())
        .or_else(|| env::var(&env_name).ok().filter(|s| !s.trim().is_empty()))
        .ok_or(ConfigError::MissingJwtSecret { env: env_name })?;

    let mut config = AuthConfig::new(secret);
    if let Some(minutes) = raw.access_token_minutes {
        config.access_ttl = positive("auth.access_token_minutes", minutes, Duration::minutes)?;
    }
    if let Some(days) = raw.refresh_token_days {
        config.refresh_ttl = positive("auth.refresh_token_days", days, Duration::days)?;
    }
    if let Some(hours) = raw.activation_token_hours {
        config.activation_ttl = positive("auth.activation_token_hours", hours, Duration::hours)?;
    }
    if let Some(hours) = raw.password_reset_token_hours {
        config.password_reset_ttl =
            positive("auth.password_reset_token_hours", hours, Duration::hours)?;
    }
    if let Some(protect) = raw.protect_resources {
        config.protect_resources = protect;
    }
    Ok(config)
}

fn positive(
    field: &'static str,
    value: i64,
    to_duration: fn(i64) -> Duration,
) -> Result<Duration, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be positive, got {value}"),
        });
    }
    Ok(to_duration(value))
}
