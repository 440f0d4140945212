//! SQLite persistence for agents, tools, webhooks and identities.
//!
//! One [`Store`] wraps a connection pool; entity-specific queries live in the
//! sibling modules as further `impl Store` blocks.

mod agents;
mod error;
mod organizations;
mod schema;
mod tokens;
mod tools;
mod users;
mod webhooks;

pub use error::StoreError;
pub use tools::NewTool;
pub use users::UserCredentials;

use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the configured database and apply the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = if config.is_in_memory() {
            memory_pool().await?
        } else {
            let url = normalize_url(&config.url);
            prepare_parent_dir(&url).await?;
            let options = SqliteConnectOptions::from_str(&url)?
                .create_if_missing(true)
                .foreign_keys(true);
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.migrate().await?;
        info!(url = %config.url, "Database ready");
        Ok(store)
    }

    /// Private in-memory database, used by tests and `ephemeral` configs.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let store = Self {
            pool: memory_pool().await?,
        };
        store.migrate().await?;
        Ok(store)
    }

    /// Run schema creation (CREATE TABLE IF NOT EXISTS).
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in schema::MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!(tables = schema::MIGRATIONS.len(), "Schema applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// A single connection that never expires: every new connection to
// `sqlite::memory:` would otherwise see an empty database.
async fn memory_pool() -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}

fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("sqlite:") {
        url.to_string()
    } else {
        format!("sqlite://{url}")
    }
}

async fn prepare_parent_dir(url: &str) -> Result<(), StoreError> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    let Some(parent) = Path::new(path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| StoreError::Io {
            path: parent.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_paths_gain_the_sqlite_scheme() {
        assert_eq!(normalize_url("data/app.db"), "sqlite://data/app.db");
        assert_eq!(normalize_url("sqlite://x.db"), "sqlite://x.db");
    }

    #[tokio::test]
    async fn file_database_is_created_with_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("glymph.db");
        let config = DatabaseConfig::new(format!("sqlite://{}", path.display()));

        let store = Store::connect(&config).await.unwrap();
        assert!(store.list_agents().await.unwrap().is_empty());
        assert!(path.exists());
    }
}
