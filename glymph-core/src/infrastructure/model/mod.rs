//! Model infrastructure module
//!
//! Provides LLM clients behind a factory so the agent assembler never needs
//! to know which provider it is talking to.
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - LlmClient, ClientFactory traits
//! - `adapter` - Message format adapters
//! - `factory` - Provider tag parsing and the HTTP client factory
//! - `clients` - Individual client implementations

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

pub use factory::{HttpClientFactory, ProviderKind};
pub use traits::{ClientFactory, LlmClient};
pub use types::{ModelError, ModelRequest, ModelResponse};
