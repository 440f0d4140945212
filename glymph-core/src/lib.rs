//! Glymph agents manager.
//!
//! Persists agent, tool and webhook configurations, serves them over HTTP and
//! rebuilds a runnable agent from a stored configuration whenever it is asked
//! to answer an input.
//!
//! # Structure
//! - `config` - TOML configuration loading and validation
//! - `domain` - Records exchanged between the store, the pipeline and the API
//! - `application` - Validation, tool resolution, agent assembly, auth
//! - `infrastructure` - LLM clients, SQLite store, REST server

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, auth, tooling, validation};
pub use config::{AppConfig, ConfigError};
pub use domain::types;
pub use infrastructure::{model, server, store};
