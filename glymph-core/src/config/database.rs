use crate::constants::{DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS};
use serde::Deserialize;

/// Relational store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `sqlite://path/to/file.db`, a bare path, or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        let url = self.url.trim();
        url.is_empty() || url.ends_with(":memory:") || url == "memory"
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawDatabase {
    pub(super) url: Option<String>,
    pub(super) max_connections: Option<u32>,
}
